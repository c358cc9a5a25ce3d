use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(AllergySeverity {
    Mild => "mild",
    Moderate => "moderate",
    Severe => "severe",
    LifeThreatening => "life_threatening",
});

str_enum!(IncidentSeverity {
    Low => "low",
    Medium => "medium",
    High => "high",
    Critical => "critical",
});

str_enum!(IncidentStatus {
    Pending => "pending",
    UnderReview => "under_review",
    Resolved => "resolved",
    Closed => "closed",
});

str_enum!(AppointmentStatus {
    Scheduled => "scheduled",
    InProgress => "in_progress",
    Completed => "completed",
    Cancelled => "cancelled",
    NoShow => "no_show",
});

str_enum!(AppointmentType {
    RoutineCheckup => "routine_checkup",
    MedicationAdministration => "medication_administration",
    InjuryAssessment => "injury_assessment",
    IllnessEvaluation => "illness_evaluation",
    Screening => "screening",
    FollowUp => "follow_up",
    Emergency => "emergency",
});

impl IncidentSeverity {
    /// High and critical incidents surface as warnings on the dashboard.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

impl AppointmentType {
    /// Human-readable label, e.g. `"Routine checkup"`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::RoutineCheckup => "Routine checkup",
            Self::MedicationAdministration => "Medication administration",
            Self::InjuryAssessment => "Injury assessment",
            Self::IllnessEvaluation => "Illness evaluation",
            Self::Screening => "Screening",
            Self::FollowUp => "Follow-up",
            Self::Emergency => "Emergency",
        }
    }
}
