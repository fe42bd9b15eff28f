use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Late => "late",
            AttendanceStatus::Excused => "excused",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "present" => Some(AttendanceStatus::Present),
            "absent" => Some(AttendanceStatus::Absent),
            "late" => Some(AttendanceStatus::Late),
            "excused" => Some(AttendanceStatus::Excused),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSchedule {
    pub day: ScheduleDay,
    pub start_time: String,
    pub end_time: String,
    pub subject: String,
}

/// One school class: a named group of students owned by a teacher, with a
/// weekly schedule. `students` holds user ids; nothing reconciles them against
/// each student's `class` name (historical gap, deliberately not enforced).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: String,
    pub name: String,
    pub grade: String,
    pub department: String,
    pub teacher: String,
    pub students: Vec<String>,
    pub schedule: Vec<ClassSchedule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub classes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub student_id: String,
    pub class: String,
    pub grade: String,
    pub department: String,
}

/// A signed-in identity. The `role` tag is closed; every role-dependent
/// behavior matches exhaustively on this.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum User {
    Teacher(Teacher),
    Student(Student),
}

impl User {
    pub fn id(&self) -> &str {
        match self {
            User::Teacher(t) => &t.id,
            User::Student(s) => &s.id,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            User::Teacher(t) => &t.email,
            User::Student(s) => &s.email,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAttendance {
    pub student_id: String,
    pub status: AttendanceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_in: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One class's attendance sheet for one calendar day. There is exactly one
/// record per (class, date); the id is derived from the pair. Entries are not
/// de-duplicated per student (historical gap, kept as-is).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: String,
    pub class_id: String,
    pub date: String,
    pub created_by: String,
    pub last_updated: String,
    pub qr_code: String,
    pub records: Vec<StudentAttendance>,
}

pub fn attendance_record_id(date: &str, class_id: &str) -> String {
    format!("{}-class-{}", date, class_id)
}

pub fn attendance_qr_code(class_id: &str, date: &str) -> String {
    format!("attendance-{}-{}", class_id, date)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceStats {
    pub present: usize,
    pub absent: usize,
    pub late: usize,
    pub excused: usize,
    pub total: usize,
    pub percentage: f64,
}

impl AttendanceStats {
    /// Total is the sum of the four buckets; percentage is the present share
    /// in percent, rounded to one decimal, 0.0 for an empty set.
    pub fn from_counts(present: usize, absent: usize, late: usize, excused: usize) -> Self {
        let total = present + absent + late + excused;
        let percentage = if total == 0 {
            0.0
        } else {
            let raw = present as f64 / total as f64 * 100.0;
            (raw * 10.0).round() / 10.0
        };
        AttendanceStats {
            present,
            absent,
            late,
            excused,
            total,
            percentage,
        }
    }
}
