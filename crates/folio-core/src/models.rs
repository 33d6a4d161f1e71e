//! Data models for folio
//!
//! Defines the portfolio content records: Project, ExperienceItem,
//! QualificationItem and the Resume singleton. Records are flat and
//! serde-serializable; their field names double as the column names of
//! the remote tables.
//!
//! Every record can be normalized: strings trimmed, missing values
//! coerced to defaults, ids stringified. Loosely-typed input (old local
//! files, remote rows) always passes through normalization on read.

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Current time as epoch milliseconds
pub(crate) fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Generate a fresh record id
///
/// Ids are opaque strings; fresh ones combine a millisecond timestamp
/// with a short random suffix so they sort roughly by creation time.
pub fn fresh_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", now_millis(), &suffix[..6])
}

fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

// ==================== Enums ====================

/// Proficiency level of a skill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkillLevel {
    Basic,
    #[default]
    Intermediate,
    Proficient,
}

impl SkillLevel {
    /// Canonical name, as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Basic => "Basic",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Proficient => "Proficient",
        }
    }

    /// Lenient mapping: unknown values coerce to the default
    pub fn from_name(value: &str) -> Self {
        let value = value.trim();
        if value.eq_ignore_ascii_case("basic") {
            SkillLevel::Basic
        } else if value.eq_ignore_ascii_case("proficient") {
            SkillLevel::Proficient
        } else {
            SkillLevel::Intermediate
        }
    }
}

impl std::fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SkillLevel {
    type Err = Error;

    /// Strict parse for user input (unlike deserialization, typos error)
    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim();
        if value.eq_ignore_ascii_case("basic") {
            Ok(SkillLevel::Basic)
        } else if value.eq_ignore_ascii_case("intermediate") {
            Ok(SkillLevel::Intermediate)
        } else if value.eq_ignore_ascii_case("proficient") {
            Ok(SkillLevel::Proficient)
        } else {
            Err(Error::Validation(format!(
                "Unknown level '{}'. Use basic, intermediate or proficient.",
                s
            )))
        }
    }
}

impl Serialize for SkillLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SkillLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(SkillLevel::from_name(&value))
    }
}

/// Which skill column a skill belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkillCategory {
    #[default]
    Frontend,
    Backend,
}

impl SkillCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Frontend => "frontend",
            SkillCategory::Backend => "backend",
        }
    }

    /// Lenient mapping: anything that isn't "backend" is frontend
    pub fn from_name(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("backend") {
            SkillCategory::Backend
        } else {
            SkillCategory::Frontend
        }
    }
}

impl std::fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SkillCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim();
        if value.eq_ignore_ascii_case("frontend") {
            Ok(SkillCategory::Frontend)
        } else if value.eq_ignore_ascii_case("backend") {
            Ok(SkillCategory::Backend)
        } else {
            Err(Error::Validation(format!(
                "Unknown category '{}'. Use frontend or backend.",
                s
            )))
        }
    }
}

impl Serialize for SkillCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SkillCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(SkillCategory::from_name(&value))
    }
}

/// Which timeline a qualification entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QualificationCategory {
    #[default]
    Education,
    Experience,
}

impl QualificationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualificationCategory::Education => "education",
            QualificationCategory::Experience => "experience",
        }
    }

    /// Lenient mapping: anything that isn't "experience" is education
    pub fn from_name(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("experience") {
            QualificationCategory::Experience
        } else {
            QualificationCategory::Education
        }
    }
}

impl std::fmt::Display for QualificationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for QualificationCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim();
        if value.eq_ignore_ascii_case("education") {
            Ok(QualificationCategory::Education)
        } else if value.eq_ignore_ascii_case("experience") {
            Ok(QualificationCategory::Experience)
        } else {
            Err(Error::Validation(format!(
                "Unknown category '{}'. Use education or experience.",
                s
            )))
        }
    }
}

impl Serialize for QualificationCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for QualificationCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(QualificationCategory::from_name(&value))
    }
}

// ==================== Project ====================

/// A portfolio project card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    /// Unique identifier (opaque string)
    #[serde(default)]
    pub id: String,
    /// Display title
    #[serde(default)]
    pub title: String,
    /// Image URL
    #[serde(default)]
    pub image: String,
    /// Repository URL
    #[serde(default)]
    pub github: String,
    /// Live demo URL
    #[serde(default)]
    pub demo: String,
    /// Ordered tag list
    #[serde(default)]
    pub tags: Vec<String>,
    /// Short description
    #[serde(default)]
    pub desc: String,
    /// Badge flags
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_popular: bool,
    /// Creation time, epoch millis
    #[serde(default)]
    pub created_at: i64,
    /// Display position; lower sorts first
    #[serde(default)]
    pub sort_order: i64,
}

impl Project {
    /// Create a new project with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: fresh_id(),
            title: title.into(),
            image: String::new(),
            github: String::new(),
            demo: String::new(),
            tags: Vec::new(),
            desc: String::new(),
            is_new: false,
            is_featured: false,
            is_popular: false,
            created_at: now_millis(),
            sort_order: 0,
        }
    }

    /// Coerce into canonical shape: trim strings, default missing values
    pub fn normalize(&mut self) {
        self.id = trimmed(&self.id);
        if self.id.is_empty() {
            self.id = fresh_id();
        }
        self.title = trimmed(&self.title);
        if self.title.is_empty() {
            self.title = "Untitled Project".to_string();
        }
        self.image = trimmed(&self.image);
        self.github = trimmed(&self.github);
        self.demo = trimmed(&self.demo);
        self.desc = trimmed(&self.desc);
        self.tags = self
            .tags
            .iter()
            .map(|tag| trimmed(tag))
            .filter(|tag| !tag.is_empty())
            .collect();
        if self.created_at == 0 {
            self.created_at = now_millis();
        }
    }

    /// Required fields must be present before a mutation persists
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation("Project title is required.".to_string()));
        }
        Ok(())
    }
}

// ==================== ExperienceItem ====================

/// A single skill entry in the experience section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExperienceItem {
    #[serde(default)]
    pub id: String,
    /// Skill name
    #[serde(default)]
    pub skill: String,
    /// Proficiency level
    #[serde(default)]
    pub level: SkillLevel,
    /// Which column it renders under
    #[serde(default)]
    pub category: SkillCategory,
    /// Display position; lower sorts first
    #[serde(default)]
    pub sort_order: i64,
}

impl ExperienceItem {
    /// Create a new skill entry
    pub fn new(skill: impl Into<String>, level: SkillLevel, category: SkillCategory) -> Self {
        Self {
            id: fresh_id(),
            skill: skill.into(),
            level,
            category,
            sort_order: 0,
        }
    }

    pub fn normalize(&mut self) {
        self.id = trimmed(&self.id);
        if self.id.is_empty() {
            self.id = fresh_id();
        }
        self.skill = trimmed(&self.skill);
    }

    pub fn validate(&self) -> Result<()> {
        if self.skill.trim().is_empty() {
            return Err(Error::Validation("Skill is required.".to_string()));
        }
        Ok(())
    }
}

// ==================== QualificationItem ====================

/// A timeline entry (education or work experience)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QualificationItem {
    #[serde(default)]
    pub id: String,
    /// Degree or role
    #[serde(default)]
    pub title: String,
    /// Institution or company
    #[serde(default)]
    pub subtitle: String,
    /// Free-text period, e.g. "2022 - 2026"
    #[serde(default)]
    pub period: String,
    /// Which timeline it renders under
    #[serde(default)]
    pub category: QualificationCategory,
    /// Display position; materializes insertion order
    #[serde(default)]
    pub sort_order: i64,
}

impl QualificationItem {
    /// Create a new timeline entry
    pub fn new(
        title: impl Into<String>,
        subtitle: impl Into<String>,
        period: impl Into<String>,
        category: QualificationCategory,
    ) -> Self {
        Self {
            id: fresh_id(),
            title: title.into(),
            subtitle: subtitle.into(),
            period: period.into(),
            category,
            sort_order: 0,
        }
    }

    pub fn normalize(&mut self) {
        self.id = trimmed(&self.id);
        if self.id.is_empty() {
            self.id = fresh_id();
        }
        self.title = trimmed(&self.title);
        self.subtitle = trimmed(&self.subtitle);
        self.period = trimmed(&self.period);
    }

    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty()
            || self.subtitle.trim().is_empty()
            || self.period.trim().is_empty()
        {
            return Err(Error::Validation(
                "Title, subtitle and period are required.".to_string(),
            ));
        }
        Ok(())
    }
}

// ==================== Resume ====================

/// The resume singleton: a public URL plus a download file name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resume {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub file_name: String,
}

impl Default for Resume {
    fn default() -> Self {
        Self {
            url: String::new(),
            file_name: "Resume.pdf".to_string(),
        }
    }
}

impl Resume {
    pub fn new(url: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            file_name: file_name.into(),
        }
    }

    pub fn normalize(&mut self) {
        self.url = trimmed(&self.url);
        self.file_name = trimmed(&self.file_name);
        if self.file_name.is_empty() {
            self.file_name = "Resume.pdf".to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(Error::Validation("Resume URL is required.".to_string()));
        }
        Ok(())
    }
}
