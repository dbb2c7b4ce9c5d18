use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Courses a visitor can leave feedback for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Course {
    #[serde(rename = "System Design")]
    SystemDesign,
    #[serde(rename = "Spring Boot")]
    SpringBoot,
    #[serde(rename = "GenAI")]
    GenAi,
    #[serde(rename = "Security")]
    Security,
}

impl Course {
    pub const ALL: [Course; 4] = [
        Course::SystemDesign,
        Course::SpringBoot,
        Course::GenAi,
        Course::Security,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Course::SystemDesign => "System Design",
            Course::SpringBoot => "Spring Boot",
            Course::GenAi => "GenAI",
            Course::Security => "Security",
        }
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown course: {0:?}")]
pub struct UnknownCourse(pub String);

impl FromStr for Course {
    type Err = UnknownCourse;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Course::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCourse(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_course_name() {
        for course in Course::ALL {
            assert_eq!(course.as_str().parse::<Course>(), Ok(course));
        }
    }

    #[test]
    fn test_parse_is_exact() {
        assert!("genai".parse::<Course>().is_err());
        assert!(" GenAI".parse::<Course>().is_err());
        assert!("".parse::<Course>().is_err());
    }

    #[test]
    fn test_serde_uses_display_names() {
        let json = serde_json::to_string(&Course::SpringBoot).unwrap();
        assert_eq!(json, "\"Spring Boot\"");
        let course: Course = serde_json::from_str("\"System Design\"").unwrap();
        assert_eq!(course, Course::SystemDesign);
    }
}
