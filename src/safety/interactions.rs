use serde::Serialize;

/// Ordered most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionSeverity {
    Contraindicated,
    Major,
    Moderate,
    Minor,
}

struct KnownInteraction {
    a: &'static str,
    b: &'static str,
    severity: InteractionSeverity,
    management: &'static str,
}

const INTERACTIONS: &[KnownInteraction] = &[
    KnownInteraction {
        a: "methylphenidate",
        b: "phenelzine",
        severity: InteractionSeverity::Contraindicated,
        management: "Do not combine; hypertensive crisis risk. Allow 14 days after MAOI.",
    },
    KnownInteraction {
        a: "sertraline",
        b: "tramadol",
        severity: InteractionSeverity::Major,
        management: "Serotonin syndrome and seizure risk; avoid or monitor closely.",
    },
    KnownInteraction {
        a: "fluoxetine",
        b: "ibuprofen",
        severity: InteractionSeverity::Moderate,
        management: "Increased bleeding risk; watch for GI bleeding or bruising.",
    },
    KnownInteraction {
        a: "albuterol",
        b: "propranolol",
        severity: InteractionSeverity::Major,
        management: "Non-selective beta-blocker blunts bronchodilation; notify prescriber.",
    },
    KnownInteraction {
        a: "clonidine",
        b: "guanfacine",
        severity: InteractionSeverity::Moderate,
        management: "Additive hypotension and sedation; check blood pressure.",
    },
    KnownInteraction {
        a: "lamotrigine",
        b: "valproate",
        severity: InteractionSeverity::Major,
        management: "Valproate raises lamotrigine levels; rash risk. Dose per prescriber.",
    },
    KnownInteraction {
        a: "cetirizine",
        b: "diphenhydramine",
        severity: InteractionSeverity::Minor,
        management: "Duplicate antihistamine sedation; avoid same-day doses.",
    },
    KnownInteraction {
        a: "amoxicillin",
        b: "methotrexate",
        severity: InteractionSeverity::Major,
        management: "Reduced methotrexate clearance; toxicity risk.",
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionAlert {
    pub medications: [String; 2],
    pub severity: InteractionSeverity,
    pub management: String,
}

fn lookup(x: &str, y: &str) -> Option<&'static KnownInteraction> {
    INTERACTIONS
        .iter()
        .find(|i| (i.a == x && i.b == y) || (i.a == y && i.b == x))
}

/// Known interactions among every pair of `names`, most severe first.
pub fn interaction_alerts(names: &[String]) -> Vec<InteractionAlert> {
    let normalized = super::normalize_names(names);

    let mut alerts = Vec::new();
    for (i, x) in normalized.iter().enumerate() {
        for y in &normalized[i + 1..] {
            if let Some(hit) = lookup(x, y) {
                alerts.push(InteractionAlert {
                    medications: [x.clone(), y.clone()],
                    severity: hit.severity,
                    management: hit.management.to_string(),
                });
            }
        }
    }
    alerts.sort_by_key(|a| a.severity);
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn finds_pair_in_any_order() {
        let alerts = interaction_alerts(&names(&["Propranolol", "albuterol"]));
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, InteractionSeverity::Major);
        assert_eq!(alerts[0].medications, ["albuterol".to_string(), "propranolol".to_string()]);
    }

    #[test]
    fn sorted_most_severe_first() {
        let alerts = interaction_alerts(&names(&[
            "cetirizine",
            "diphenhydramine",
            "methylphenidate",
            "phenelzine",
            "clonidine",
            "guanfacine",
        ]));
        let severities: Vec<_> = alerts.iter().map(|a| a.severity).collect();
        assert_eq!(
            severities,
            vec![
                InteractionSeverity::Contraindicated,
                InteractionSeverity::Moderate,
                InteractionSeverity::Minor,
            ]
        );
    }

    #[test]
    fn duplicates_and_singletons_are_quiet() {
        assert!(interaction_alerts(&names(&["albuterol"])).is_empty());
        assert!(interaction_alerts(&names(&["albuterol", "ALBUTEROL "])).is_empty());
        assert!(interaction_alerts(&[]).is_empty());
    }
}
