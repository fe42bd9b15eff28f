//! Built-in fixture data, used whenever a workspace blob is missing or
//! unreadable. Attendance generation is parameterized on "today" so tests can
//! pin the window.

use chrono::{Days, NaiveDate};

use crate::model::{
    attendance_qr_code, attendance_record_id, AttendanceRecord, AttendanceStatus, Class,
    ClassSchedule, ScheduleDay, Student, StudentAttendance, Teacher,
};

pub fn seed_teachers() -> Vec<Teacher> {
    vec![
        Teacher {
            id: "1".to_string(),
            name: "John Smith".to_string(),
            email: "teacher@example.com".to_string(),
            avatar: Some(
                "https://images.pexels.com/photos/220453/pexels-photo-220453.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2"
                    .to_string(),
            ),
            subjects: vec!["Mathematics".to_string(), "Physics".to_string()],
            classes: vec![
                "TKJ-10A".to_string(),
                "RPL-11B".to_string(),
                "MM-12A".to_string(),
            ],
        },
        Teacher {
            id: "2".to_string(),
            name: "Emily Johnson".to_string(),
            email: "emily.johnson@example.com".to_string(),
            avatar: Some(
                "https://images.pexels.com/photos/1181686/pexels-photo-1181686.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2"
                    .to_string(),
            ),
            subjects: vec!["Programming".to_string(), "Database".to_string()],
            classes: vec!["RPL-10B".to_string(), "TKJ-12A".to_string()],
        },
    ]
}

pub fn seed_students() -> Vec<Student> {
    vec![
        Student {
            id: "1".to_string(),
            name: "Alice Cooper".to_string(),
            email: "student@example.com".to_string(),
            avatar: Some(
                "https://images.pexels.com/photos/1181695/pexels-photo-1181695.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2"
                    .to_string(),
            ),
            student_id: "2023001".to_string(),
            class: "TKJ-10A".to_string(),
            grade: "10".to_string(),
            department: "Computer and Network Engineering".to_string(),
        },
        Student {
            id: "2".to_string(),
            name: "Bob Johnson".to_string(),
            email: "bob.johnson@example.com".to_string(),
            avatar: Some(
                "https://images.pexels.com/photos/1681010/pexels-photo-1681010.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2"
                    .to_string(),
            ),
            student_id: "2023002".to_string(),
            class: "RPL-10B".to_string(),
            grade: "10".to_string(),
            department: "Software Engineering".to_string(),
        },
        Student {
            id: "3".to_string(),
            name: "Carol Williams".to_string(),
            email: "carol.williams@example.com".to_string(),
            avatar: Some(
                "https://images.pexels.com/photos/1382731/pexels-photo-1382731.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2"
                    .to_string(),
            ),
            student_id: "2023003".to_string(),
            class: "MM-12A".to_string(),
            grade: "12".to_string(),
            department: "Multimedia".to_string(),
        },
    ]
}

fn schedule(day: ScheduleDay, start: &str, end: &str, subject: &str) -> ClassSchedule {
    ClassSchedule {
        day,
        start_time: start.to_string(),
        end_time: end.to_string(),
        subject: subject.to_string(),
    }
}

pub fn seed_classes() -> Vec<Class> {
    vec![
        Class {
            id: "1".to_string(),
            name: "TKJ-10A".to_string(),
            grade: "10".to_string(),
            department: "Computer and Network Engineering".to_string(),
            teacher: "1".to_string(),
            students: vec!["1".to_string()],
            schedule: vec![
                schedule(ScheduleDay::Monday, "08:00", "09:30", "Network Fundamentals"),
                schedule(ScheduleDay::Tuesday, "10:00", "11:30", "Computer Hardware"),
                schedule(ScheduleDay::Wednesday, "13:00", "14:30", "Operating Systems"),
            ],
        },
        Class {
            id: "2".to_string(),
            name: "RPL-10B".to_string(),
            grade: "10".to_string(),
            department: "Software Engineering".to_string(),
            teacher: "2".to_string(),
            students: vec!["2".to_string()],
            schedule: vec![
                schedule(ScheduleDay::Monday, "10:00", "11:30", "Programming Basics"),
                schedule(ScheduleDay::Thursday, "08:00", "09:30", "Database Design"),
            ],
        },
        Class {
            id: "3".to_string(),
            name: "MM-12A".to_string(),
            grade: "12".to_string(),
            department: "Multimedia".to_string(),
            teacher: "1".to_string(),
            students: vec!["3".to_string()],
            schedule: vec![
                schedule(ScheduleDay::Wednesday, "08:00", "09:30", "Digital Design"),
                schedule(ScheduleDay::Friday, "10:00", "11:30", "Video Editing"),
            ],
        },
    ]
}

/// Attendance sheets for the trailing week: one record per class per day.
/// Every fifth day (counting back from today) is a full-class absence.
pub fn seed_attendance(classes: &[Class], today: NaiveDate) -> Vec<AttendanceRecord> {
    let mut records = Vec::new();

    for i in 0..7u64 {
        let date = today - Days::new(i);
        let date_string = date.format("%Y-%m-%d").to_string();
        let absent_day = i % 5 == 0;

        for cls in classes {
            records.push(AttendanceRecord {
                id: attendance_record_id(&date_string, &cls.id),
                class_id: cls.id.clone(),
                date: date_string.clone(),
                created_by: cls.teacher.clone(),
                last_updated: date_string.clone(),
                qr_code: attendance_qr_code(&cls.id, &date_string),
                records: cls
                    .students
                    .iter()
                    .map(|student_id| StudentAttendance {
                        student_id: student_id.clone(),
                        status: if absent_day {
                            AttendanceStatus::Absent
                        } else {
                            AttendanceStatus::Present
                        },
                        time_in: if absent_day {
                            None
                        } else {
                            Some("08:00".to_string())
                        },
                        notes: None,
                    })
                    .collect(),
            });
        }
    }

    records
}
