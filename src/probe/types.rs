//! Core probe data model.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::probe::strategy::Strategy;

/// Outcome of probing one host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Reachable and, where the strategy checks content, correct.
    Green,
    /// Unreachable, timed out, bad status or content mismatch.
    Red,
}

impl Verdict {
    pub fn from_bool(ok: bool) -> Self {
        if ok {
            Verdict::Green
        } else {
            Verdict::Red
        }
    }

    pub fn is_green(self) -> bool {
        self == Verdict::Green
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Green => "green",
            Verdict::Red => "red",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A monitored host and the policy used to judge it.
#[derive(Debug, Clone)]
pub struct HostSpec {
    /// Host identity; unique within a host list.
    pub host: String,
    pub strategy: Strategy,
}

impl HostSpec {
    pub fn new(host: impl Into<String>, strategy: Strategy) -> Self {
        Self {
            host: host.into(),
            strategy,
        }
    }

    /// URL the probe is sent to.
    pub fn target_url(&self) -> String {
        match self.strategy.probe_url() {
            Some(url) => url.to_string(),
            None => format!("https://{}/", self.host),
        }
    }
}

/// Raw material a strategy judges: what came back from one request.
#[derive(Debug, Clone, Default)]
pub struct ProbeResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl ProbeResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    pub fn with_body(mut self, content_type: Option<&str>, body: impl Into<Vec<u8>>) -> Self {
        self.content_type = content_type.map(str::to_string);
        self.body = body.into();
        self
    }

    /// Final status in [200, 400). Redirects have already been followed.
    pub fn is_ok(&self) -> bool {
        (200..400).contains(&self.status)
    }
}

/// Ordered per-host verdicts, one per [`HostSpec`], in host list order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSnapshot {
    entries: Vec<(String, Verdict)>,
}

impl StatusSnapshot {
    pub fn new(entries: Vec<(String, Verdict)>) -> Self {
        Self { entries }
    }

    /// Snapshot with every host red. Used when a refresh could not complete.
    pub fn all_red(hosts: &[HostSpec]) -> Self {
        Self {
            entries: hosts
                .iter()
                .map(|spec| (spec.host.clone(), Verdict::Red))
                .collect(),
        }
    }

    pub fn entries(&self) -> &[(String, Verdict)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn verdict(&self, host: &str) -> Option<Verdict> {
        self.entries
            .iter()
            .find(|(h, _)| h == host)
            .map(|(_, v)| *v)
    }

    pub fn green_count(&self) -> usize {
        self.entries.iter().filter(|(_, v)| v.is_green()).count()
    }
}

/// Serializes as `[{"host": "green"}, ...]`.
impl Serialize for StatusSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Entry<'a>(&'a str, Verdict);

        impl Serialize for Entry<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(self.0, &self.1)?;
                map.end()
            }
        }

        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for (host, verdict) in &self.entries {
            seq.serialize_element(&Entry(host, *verdict))?;
        }
        seq.end()
    }
}
