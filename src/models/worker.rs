use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkerRole {
    FieldWorker,
    Dispatcher,
    Manager,
}

impl WorkerRole {
    pub fn is_office(self) -> bool {
        matches!(self, WorkerRole::Dispatcher | WorkerRole::Manager)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Basic,
    Intermediate,
    Expert,
}

impl SkillLevel {
    pub fn label(self) -> &'static str {
        match self {
            SkillLevel::Basic => "basic",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Expert => "expert",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub category: Option<String>,
    pub level: SkillLevel,
}

/// A worker's skill set, resolved once at construction. Providers onboarded
/// before skill levels existed only have flat name lists; those stay on the
/// legacy variant instead of being re-branched at every scoring call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capabilities {
    Leveled(Vec<Skill>),
    Legacy(Vec<String>),
}

impl Capabilities {
    pub fn is_empty(&self) -> bool {
        match self {
            Capabilities::Leveled(skills) => skills.is_empty(),
            Capabilities::Legacy(names) => names.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub name: String,
    pub role: WorkerRole,
    pub status: WorkerStatus,
    pub capabilities: Capabilities,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::{SkillLevel, WorkerRole};

    #[test]
    fn office_roles() {
        assert!(!WorkerRole::FieldWorker.is_office());
        assert!(WorkerRole::Dispatcher.is_office());
        assert!(WorkerRole::Manager.is_office());
    }

    #[test]
    fn skill_levels_order_by_proficiency() {
        assert!(SkillLevel::Expert > SkillLevel::Intermediate);
        assert!(SkillLevel::Intermediate > SkillLevel::Basic);
    }
}
