//! Role-scoped attendance views: filtering, aggregation, pagination, and the
//! CSV export. Pure functions over the record collections; callers pass the
//! viewer explicitly.

use std::collections::HashSet;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::model::{
    AttendanceRecord, AttendanceStats, AttendanceStatus, Class, Student, User,
};

pub const RECORDS_PER_PAGE: usize = 10;

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

#[derive(Debug, Clone)]
pub struct HistoryQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub class_id: Option<String>,
    pub status: Option<AttendanceStatus>,
    /// Teacher-only; ignored for student viewers, who are always restricted
    /// to their own entries.
    pub student_id: Option<String>,
}

fn prune_entries<F>(records: &mut Vec<AttendanceRecord>, keep: F)
where
    F: Fn(&crate::model::StudentAttendance) -> bool,
{
    for record in records.iter_mut() {
        record.records.retain(&keep);
    }
    records.retain(|r| !r.records.is_empty());
}

/// Classes the viewer can see: a teacher's own classes, or the classes whose
/// name matches the student's class.
pub fn visible_classes<'a>(classes: &'a [Class], viewer: &User) -> Vec<&'a Class> {
    match viewer {
        User::Teacher(t) => classes.iter().filter(|c| c.teacher == t.id).collect(),
        User::Student(s) => classes.iter().filter(|c| c.name == s.class).collect(),
    }
}

/// Produce the filtered, role-scoped history view, newest date first.
///
/// Filter order matches the page this replaces: class scoping, then the
/// inclusive date range, then per-entry pruning (own entries for students,
/// status, teacher's student filter). Records whose date fails to parse are
/// dropped by the range filter. Every surviving record keeps at least one
/// entry satisfying all active per-entry filters.
pub fn filter_history(
    records: &[AttendanceRecord],
    classes: &[Class],
    viewer: &User,
    query: &HistoryQuery,
) -> Vec<AttendanceRecord> {
    let mut filtered: Vec<AttendanceRecord> = records.to_vec();

    match viewer {
        User::Teacher(t) => {
            // Teachers only ever see classes they own, whether or not an
            // explicit class filter is set.
            let owned: HashSet<&str> = classes
                .iter()
                .filter(|c| c.teacher == t.id)
                .map(|c| c.id.as_str())
                .collect();
            filtered.retain(|r| owned.contains(r.class_id.as_str()));
            if let Some(class_id) = &query.class_id {
                filtered.retain(|r| &r.class_id == class_id);
            }
        }
        User::Student(s) => {
            if let Some(class_id) = &query.class_id {
                filtered.retain(|r| &r.class_id == class_id);
            } else if let Some(own_class) = classes.iter().find(|c| c.name == s.class) {
                // No class restriction when the student's class name resolves
                // to nothing; the per-entry pruning below still applies.
                let id = own_class.id.clone();
                filtered.retain(|r| r.class_id == id);
            }
        }
    }

    filtered.retain(|r| {
        parse_date(&r.date)
            .map(|d| query.start <= d && d <= query.end)
            .unwrap_or(false)
    });

    if let User::Student(s) = viewer {
        prune_entries(&mut filtered, |e| e.student_id == s.id);
    }
    if let Some(status) = query.status {
        prune_entries(&mut filtered, |e| e.status == status);
    }
    if let (User::Teacher(_), Some(student_id)) = (viewer, &query.student_id) {
        prune_entries(&mut filtered, |e| &e.student_id == student_id);
    }

    // Stable sort: records sharing a date keep their stored order.
    filtered.sort_by(|a, b| parse_date(&b.date).cmp(&parse_date(&a.date)));
    filtered
}

/// Fixed-size page window over the sorted list. Pages are 1-based; an
/// out-of-range page yields an empty window, not an error.
pub fn paginate(records: &[AttendanceRecord], page: usize) -> (&[AttendanceRecord], usize) {
    let total_pages = records.len().div_ceil(RECORDS_PER_PAGE);
    let start = page.saturating_sub(1) * RECORDS_PER_PAGE;
    if start >= records.len() {
        return (&records[0..0], total_pages);
    }
    let end = (start + RECORDS_PER_PAGE).min(records.len());
    (&records[start..end], total_pages)
}

/// Count every entry of every record by status.
pub fn count_statuses(records: &[AttendanceRecord]) -> AttendanceStats {
    let mut present = 0;
    let mut absent = 0;
    let mut late = 0;
    let mut excused = 0;

    for record in records {
        for entry in &record.records {
            match entry.status {
                AttendanceStatus::Present => present += 1,
                AttendanceStatus::Absent => absent += 1,
                AttendanceStatus::Late => late += 1,
                AttendanceStatus::Excused => excused += 1,
            }
        }
    }

    AttendanceStats::from_counts(present, absent, late, excused)
}

/// Dashboard headline numbers. Teachers tally every entry of every record;
/// students tally the first entry carrying their id in each record, as the
/// dashboard always has.
pub fn overall_stats(records: &[AttendanceRecord], viewer: &User) -> AttendanceStats {
    match viewer {
        User::Teacher(_) => count_statuses(records),
        User::Student(s) => {
            let mut present = 0;
            let mut absent = 0;
            let mut late = 0;
            let mut excused = 0;
            for record in records {
                if let Some(entry) = record.records.iter().find(|e| e.student_id == s.id) {
                    match entry.status {
                        AttendanceStatus::Present => present += 1,
                        AttendanceStatus::Absent => absent += 1,
                        AttendanceStatus::Late => late += 1,
                        AttendanceStatus::Excused => excused += 1,
                    }
                }
            }
            AttendanceStats::from_counts(present, absent, late, excused)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DayBreakdown {
    pub date: String,
    pub present: usize,
    pub absent: usize,
    pub late: usize,
    pub excused: usize,
}

/// Per-status totals for each of the trailing 7 calendar days ending today,
/// oldest day first. Dates group by exact string match on the record date.
pub fn attendance_by_day(records: &[AttendanceRecord], today: NaiveDate) -> Vec<DayBreakdown> {
    (0..7u64)
        .rev()
        .map(|i| {
            let date = (today - Days::new(i)).format("%Y-%m-%d").to_string();
            let day_records: Vec<AttendanceRecord> = records
                .iter()
                .filter(|r| r.date == date)
                .cloned()
                .collect();
            let stats = count_statuses(&day_records);
            DayBreakdown {
                date,
                present: stats.present,
                absent: stats.absent,
                late: stats.late,
                excused: stats.excused,
            }
        })
        .collect()
}

/// Render the filtered view as CSV, one row per (record, entry). Every field
/// is double-quoted; embedded quotes are not escaped, matching the export
/// format of the system this replaces.
pub fn export_csv(
    records: &[AttendanceRecord],
    classes: &[Class],
    students: &[Student],
) -> String {
    let mut csv = String::from("Date,Class,Student,Status,Time In,Notes\n");

    for record in records {
        let class_name = classes
            .iter()
            .find(|c| c.id == record.class_id)
            .map(|c| c.name.as_str())
            .unwrap_or("Unknown");

        for entry in &record.records {
            let student_name = students
                .iter()
                .find(|s| s.id == entry.student_id)
                .map(|s| s.name.as_str())
                .unwrap_or("Unknown");

            csv.push_str(&format!(
                "\"{}\",\"{}\",\"{}\",\"{}\",\"{}\",\"{}\"\n",
                record.date,
                class_name,
                student_name,
                entry.status.as_str(),
                entry.time_in.as_deref().unwrap_or(""),
                entry.notes.as_deref().unwrap_or(""),
            ));
        }
    }

    csv
}
