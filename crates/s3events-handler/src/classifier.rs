//! Event classifier
//!
//! Maps an S3 event name (`ObjectCreated:Put`, `ObjectRestore:Completed`,
//! ...) to the status/action pair carried in the envelope. The mapping is
//! an ordered table; the first rule whose prefix matches wins. Matching
//! is case-sensitive.

use s3events_core::types::{Classification, Status};

/// What a matching rule resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    /// Always this status
    Fixed(Status),
    /// `matched` when the event name ends with `suffix`, else `otherwise`
    BySuffix {
        suffix: &'static str,
        matched: Status,
        otherwise: Status,
    },
}

/// One row of the classification table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub prefix: &'static str,
    pub outcome: RuleOutcome,
}

impl Rule {
    const fn fixed(prefix: &'static str, status: Status) -> Self {
        Self {
            prefix,
            outcome: RuleOutcome::Fixed(status),
        }
    }

    /// Status for `event_name`, or `None` if the prefix does not match
    pub fn apply(&self, event_name: &str) -> Option<Status> {
        if !event_name.starts_with(self.prefix) {
            return None;
        }
        Some(match self.outcome {
            RuleOutcome::Fixed(status) => status,
            RuleOutcome::BySuffix {
                suffix,
                matched,
                otherwise,
            } => {
                if event_name.ends_with(suffix) {
                    matched
                } else {
                    otherwise
                }
            }
        })
    }
}

/// Classification table, evaluated top to bottom
pub const RULES: &[Rule] = &[
    Rule::fixed("ObjectCreated", Status::Uploaded),
    Rule::fixed("ObjectRemoved", Status::Deleted),
    Rule {
        prefix: "ObjectRestore",
        outcome: RuleOutcome::BySuffix {
            suffix: "Completed",
            matched: Status::Uploaded,
            otherwise: Status::Restoring,
        },
    },
    Rule::fixed("Replication", Status::Replicated),
    Rule::fixed("ObjectAcl", Status::AclChanged),
    Rule::fixed("LifecycleExpiration", Status::Deleted),
    Rule::fixed("ObjectReducedRedundancyLostObject", Status::Lost),
];

/// Classify an event name. Total over all strings: names no rule
/// matches classify as `unknown`.
pub fn classify(event_name: &str) -> Classification {
    let status = RULES
        .iter()
        .find_map(|rule| rule.apply(event_name))
        .unwrap_or(Status::Unknown);
    Classification::set_status(status)
}
