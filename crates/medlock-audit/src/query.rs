//! Search and compliance-report surface over the audit trail.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use medlock_core::{DataClassification, RiskLevel};

use crate::entry::{AuditEventType, AuditLogEntry};

/// Maximum number of actors listed in a compliance report.
const TOP_ACTORS_LIMIT: usize = 10;

// =============================================================================
// Audit Query
// =============================================================================

/// Conjunctive filter over audit entries. Every set field must match;
/// an empty query matches everything. The time range is inclusive of
/// `from` and exclusive of `until`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<AuditEventType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<DataClassification>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,

    #[serde(default, with = "time::serde::rfc3339::option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<OffsetDateTime>,

    #[serde(default, with = "time::serde::rfc3339::option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<OffsetDateTime>,
}

impl AuditQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn actor(mut self, actor_id: impl Into<String>) -> Self {
        self.actor_id = Some(actor_id.into());
        self
    }

    #[must_use]
    pub fn institution(mut self, institution_id: impl Into<String>) -> Self {
        self.institution_id = Some(institution_id.into());
        self
    }

    #[must_use]
    pub fn event_type(mut self, event_type: AuditEventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    #[must_use]
    pub fn classification(mut self, classification: DataClassification) -> Self {
        self.classification = Some(classification);
        self
    }

    #[must_use]
    pub fn risk_level(mut self, risk_level: RiskLevel) -> Self {
        self.risk_level = Some(risk_level);
        self
    }

    #[must_use]
    pub fn between(mut self, from: OffsetDateTime, until: OffsetDateTime) -> Self {
        self.from = Some(from);
        self.until = Some(until);
        self
    }

    /// Whether the entry satisfies every set filter.
    #[must_use]
    pub fn matches(&self, entry: &AuditLogEntry) -> bool {
        if let Some(ref actor_id) = self.actor_id
            && entry.actor_id != *actor_id
        {
            return false;
        }
        if let Some(ref institution_id) = self.institution_id
            && entry.institution_id.as_ref() != Some(institution_id)
        {
            return false;
        }
        if let Some(event_type) = self.event_type
            && entry.event_type != event_type
        {
            return false;
        }
        if let Some(classification) = self.classification
            && !entry.classifications.contains(&classification)
        {
            return false;
        }
        if let Some(risk_level) = self.risk_level
            && entry.risk_level != risk_level
        {
            return false;
        }
        if let Some(from) = self.from
            && entry.recorded_at < from
        {
            return false;
        }
        if let Some(until) = self.until
            && entry.recorded_at >= until
        {
            return false;
        }
        true
    }
}

// =============================================================================
// Compliance Report
// =============================================================================

/// Entry counts per risk level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskHistogram {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub critical: usize,
}

impl RiskHistogram {
    fn count(&mut self, level: RiskLevel) {
        match level {
            RiskLevel::Low => self.low += 1,
            RiskLevel::Medium => self.medium += 1,
            RiskLevel::High => self.high += 1,
            RiskLevel::Critical => self.critical += 1,
        }
    }
}

/// Event count for one actor within the report window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorActivity {
    pub actor_id: String,
    pub event_count: usize,
}

/// Aggregated compliance summary for one institution over a time window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    pub institution_id: String,

    #[serde(with = "time::serde::rfc3339")]
    pub from: OffsetDateTime,

    #[serde(with = "time::serde::rfc3339")]
    pub until: OffsetDateTime,

    pub total_events: usize,

    /// Entries carrying at least one compliance flag.
    pub violation_count: usize,

    pub risk_histogram: RiskHistogram,

    /// Actors ordered by descending event count, at most ten.
    pub top_actors: Vec<ActorActivity>,
}

impl ComplianceReport {
    /// Aggregate a report from entries already scoped to the institution
    /// and window.
    #[must_use]
    pub fn aggregate(
        institution_id: impl Into<String>,
        from: OffsetDateTime,
        until: OffsetDateTime,
        entries: &[AuditLogEntry],
    ) -> Self {
        let mut histogram = RiskHistogram::default();
        let mut violation_count = 0;
        let mut per_actor: HashMap<&str, usize> = HashMap::new();

        for entry in entries {
            histogram.count(entry.risk_level);
            if !entry.compliance_flags.is_empty() {
                violation_count += 1;
            }
            *per_actor.entry(entry.actor_id.as_str()).or_default() += 1;
        }

        let mut top_actors: Vec<ActorActivity> = per_actor
            .into_iter()
            .map(|(actor_id, event_count)| ActorActivity {
                actor_id: actor_id.to_string(),
                event_count,
            })
            .collect();
        // Descending by count, ascending by id for a stable order.
        top_actors.sort_by(|a, b| {
            b.event_count
                .cmp(&a.event_count)
                .then_with(|| a.actor_id.cmp(&b.actor_id))
        });
        top_actors.truncate(TOP_ACTORS_LIMIT);

        Self {
            institution_id: institution_id.into(),
            from,
            until,
            total_events: entries.len(),
            violation_count,
            risk_histogram: histogram,
            top_actors,
        }
    }
}
