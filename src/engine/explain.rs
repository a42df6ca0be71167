use crate::models::score::FactorScores;

use super::scoring::{
    AVAILABILITY_CONFLICT, AVAILABILITY_FULL, AVAILABILITY_MINOR, CAPACITY_HEAVY, CAPACITY_LIGHT,
    MatchedSkill, PERFORMANCE_LOW, PERFORMANCE_TOP, PROXIMITY_CLOSE, PROXIMITY_FAR,
    SKILL_BASIC_ONLY, SKILL_MISSING, SKILL_STRONG,
};

/// Human-readable positives and cautions for one scored worker. The
/// cutoffs are the calculators' own bucket boundaries, imported from the
/// scoring module so the two cannot disagree.
pub fn explain(
    service_type: &str,
    factors: &FactorScores,
    matched_skill: Option<&MatchedSkill>,
    day_load_percent: f64,
) -> (Vec<String>, Vec<String>) {
    let mut reasoning = Vec::new();
    let mut warnings = Vec::new();

    if factors.skill >= SKILL_STRONG {
        match matched_skill {
            Some(MatchedSkill {
                name,
                level: Some(level),
            }) => reasoning.push(format!("strong skill match: {name} ({})", level.label())),
            Some(MatchedSkill { name, level: None }) => {
                reasoning.push(format!("strong skill match: {name}"))
            }
            None => reasoning.push("strong skill match".to_string()),
        }
    } else if factors.skill >= SKILL_BASIC_ONLY {
        warnings.push(format!("only basic proficiency in {service_type}"));
    } else if factors.skill < SKILL_MISSING {
        warnings.push(format!("no matching skill for {service_type}"));
    }

    if factors.availability == AVAILABILITY_FULL {
        reasoning.push("fully available in this time slot".to_string());
    } else if factors.availability < AVAILABILITY_CONFLICT {
        warnings.push("schedule conflicts with an existing job".to_string());
    } else if factors.availability < AVAILABILITY_MINOR {
        warnings.push("minor overlap with an existing job".to_string());
    }

    let percent = day_load_percent.round() as i64;
    if factors.capacity >= CAPACITY_LIGHT {
        reasoning.push(format!("light workload today ({percent}% booked)"));
    } else if factors.capacity < CAPACITY_HEAVY {
        warnings.push(format!("heavy workload today ({percent}% booked)"));
    }

    if factors.proximity >= PROXIMITY_CLOSE {
        reasoning.push("close to the previous job".to_string());
    } else if factors.proximity < PROXIMITY_FAR {
        warnings.push("far from the previous job".to_string());
    }

    if factors.performance >= PERFORMANCE_TOP {
        reasoning.push("top completion rate over the last 30 days".to_string());
    } else if factors.performance < PERFORMANCE_LOW {
        warnings.push("below-average completion rate".to_string());
    }

    (reasoning, warnings)
}
