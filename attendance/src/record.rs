use crate::geo::GeoPoint;
use crate::payload::SessionType;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Partial,
    Absent,
}

impl AttendanceStatus {
    /// Both checkpoints scanned is present, one is partial, none is absent.
    pub fn from_scans(first_scan: bool, second_scan: bool) -> Self {
        match (first_scan, second_scan) {
            (true, true) => AttendanceStatus::Present,
            (false, false) => AttendanceStatus::Absent,
            _ => AttendanceStatus::Partial,
        }
    }
}

/// One student's attendance for one day's session of a module class.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub student_id: String,
    pub module_id: String,
    pub class_id: String,
    /// UTC day the session's code was generated.
    pub session_date: NaiveDate,
    pub lecturer_id: String,
    pub first_scan: bool,
    pub second_scan: bool,
    pub first_scanned_at: Option<DateTime<Utc>>,
    pub second_scanned_at: Option<DateTime<Utc>>,
    /// Where the student's device was on the latest accepted scan.
    pub location: GeoPoint,
}

impl AttendanceRecord {
    pub fn status(&self) -> AttendanceStatus {
        AttendanceStatus::from_scans(self.first_scan, self.second_scan)
    }

    pub fn has_scan(&self, session_type: SessionType) -> bool {
        match session_type {
            SessionType::First => self.first_scan,
            SessionType::Second => self.second_scan,
        }
    }

    pub(crate) fn mark(&mut self, session_type: SessionType, at: DateTime<Utc>) {
        match session_type {
            SessionType::First => {
                self.first_scan = true;
                self.first_scanned_at = Some(at);
            }
            SessionType::Second => {
                self.second_scan = true;
                self.second_scanned_at = Some(at);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStats {
    pub total: u64,
    pub present_percentage: f64,
    pub partial_percentage: f64,
    pub absent_percentage: f64,
}

impl AttendanceStats {
    /// Percentages are all zero when there is nothing to count.
    pub fn from_counts(present: u64, partial: u64, absent: u64) -> Self {
        let total = present + partial + absent;
        if total == 0 {
            return Self::default();
        }
        let pct = |n: u64| n as f64 * 100.0 / total as f64;
        Self {
            total,
            present_percentage: pct(present),
            partial_percentage: pct(partial),
            absent_percentage: pct(absent),
        }
    }

    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a AttendanceRecord>,
    {
        let (mut present, mut partial, mut absent) = (0, 0, 0);
        for r in records {
            match r.status() {
                AttendanceStatus::Present => present += 1,
                AttendanceStatus::Partial => partial += 1,
                AttendanceStatus::Absent => absent += 1,
            }
        }
        Self::from_counts(present, partial, absent)
    }
}

/// Buckets records by module id, ordered by module id.
pub fn group_by_module<'a, I>(records: I) -> BTreeMap<String, Vec<&'a AttendanceRecord>>
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    let mut groups: BTreeMap<String, Vec<&AttendanceRecord>> = BTreeMap::new();
    for r in records {
        groups.entry(r.module_id.clone()).or_default().push(r);
    }
    groups
}
