//! The payroll department aggregate.
//!
//! [`PayrollDepartment`] owns an insertion-ordered list of [`WorkType`]
//! entries and enforces name uniqueness (exact, case-sensitive) across it.
//! Every mutation either succeeds completely or leaves the list untouched.

use std::cmp::Ordering;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{PayrollError, PayrollResult};
use crate::interchange::{self, RecordError};
use crate::models::WorkType;

/// An ordered, name-unique catalogue of work types.
///
/// # Example
///
/// ```
/// use payroll_engine::department::PayrollDepartment;
///
/// let mut department = PayrollDepartment::new();
/// department.add_work_type("Welding", 100.0, 0.0)?;
/// department.add_work_type("Painting", 200.0, 0.0)?;
///
/// assert_eq!(department.len(), 2);
/// assert_eq!(department.calculate_average_pay()?, 150.0);
/// # Ok::<(), payroll_engine::error::PayrollError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct PayrollDepartment {
    work_types: Vec<WorkType>,
}

impl PayrollDepartment {
    /// Creates an empty department.
    pub fn new() -> Self {
        Self::default()
    }

    fn contains_name(&self, name: &str) -> bool {
        self.work_types.iter().any(|w| w.name() == name)
    }

    fn check_index(&self, index: usize) -> PayrollResult<()> {
        if index >= self.work_types.len() {
            return Err(PayrollError::IndexOutOfRange {
                index,
                len: self.work_types.len(),
            });
        }
        Ok(())
    }

    /// Appends a new work type.
    ///
    /// The bonus strategy is chosen from `bonus_percent`: zero selects no
    /// bonus, anything else a percentage bonus.
    ///
    /// # Errors
    ///
    /// - [`PayrollError::DuplicateWorkType`] if the name is already present
    /// - [`PayrollError::InvalidRate`] if the values fail validation
    pub fn add_work_type(
        &mut self,
        name: &str,
        base_pay: f64,
        bonus_percent: f64,
    ) -> PayrollResult<()> {
        if self.contains_name(name) {
            return Err(PayrollError::DuplicateWorkType {
                name: name.to_string(),
            });
        }

        let work_type = WorkType::with_bonus(name, base_pay, bonus_percent)?;
        debug!(name, base_pay, bonus_percent, "Adding work type");
        self.work_types.push(work_type);
        Ok(())
    }

    /// Appends a new work type with no bonus.
    pub fn add_work_type_without_bonus(&mut self, name: &str, base_pay: f64) -> PayrollResult<()> {
        self.add_work_type(name, base_pay, 0.0)
    }

    /// Replaces the entry at `index` with a freshly built work type.
    ///
    /// Renaming is allowed as long as no other entry already holds the new
    /// name.
    ///
    /// # Errors
    ///
    /// - [`PayrollError::IndexOutOfRange`] if `index` is past the end
    /// - [`PayrollError::DuplicateWorkType`] if another entry has `name`
    /// - [`PayrollError::InvalidRate`] if the values fail validation
    pub fn update_work_type(
        &mut self,
        index: usize,
        name: &str,
        base_pay: f64,
        bonus_percent: f64,
    ) -> PayrollResult<()> {
        self.check_index(index)?;

        let collides = self
            .work_types
            .iter()
            .enumerate()
            .any(|(i, w)| i != index && w.name() == name);
        if collides {
            return Err(PayrollError::DuplicateWorkType {
                name: name.to_string(),
            });
        }

        let work_type = WorkType::with_bonus(name, base_pay, bonus_percent)?;
        debug!(index, name, base_pay, bonus_percent, "Replacing work type");
        self.work_types[index] = work_type;
        Ok(())
    }

    /// Removes the entry at `index`, keeping the order of the rest.
    pub fn remove_work_type(&mut self, index: usize) -> PayrollResult<WorkType> {
        self.check_index(index)?;
        let removed = self.work_types.remove(index);
        debug!(index, name = removed.name(), "Removed work type");
        Ok(removed)
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.work_types.clear();
    }

    /// Returns the entries in their current order.
    pub fn work_types(&self) -> &[WorkType] {
        &self.work_types
    }

    /// Iterates over the entries in their current order.
    pub fn iter(&self) -> std::slice::Iter<'_, WorkType> {
        self.work_types.iter()
    }

    /// Returns the entry at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&WorkType> {
        self.work_types.get(index)
    }

    /// Returns the position and entry with exactly this name, if any.
    pub fn find_by_name(&self, name: &str) -> Option<(usize, &WorkType)> {
        self.work_types
            .iter()
            .enumerate()
            .find(|(_, w)| w.name() == name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.work_types.len()
    }

    /// Returns true when the department has no entries.
    pub fn is_empty(&self) -> bool {
        self.work_types.is_empty()
    }

    /// Returns the mean final pay across all entries.
    ///
    /// # Errors
    ///
    /// [`PayrollError::EmptyWorkList`] if the department is empty.
    pub fn calculate_average_pay(&self) -> PayrollResult<f64> {
        if self.work_types.is_empty() {
            return Err(PayrollError::EmptyWorkList {
                message: "cannot calculate average".to_string(),
            });
        }

        let total: f64 = self.work_types.iter().map(WorkType::final_pay).sum();
        Ok(total / self.work_types.len() as f64)
    }

    /// Stable sort by name (byte-wise string order).
    pub fn sort_by_name(&mut self, ascending: bool) {
        self.sort_with(ascending, |a, b| a.name().cmp(b.name()));
    }

    /// Stable sort by final pay.
    pub fn sort_by_final_pay(&mut self, ascending: bool) {
        self.sort_with(ascending, |a, b| a.final_pay().total_cmp(&b.final_pay()));
    }

    fn sort_with<F>(&mut self, ascending: bool, compare: F)
    where
        F: Fn(&WorkType, &WorkType) -> Ordering,
    {
        if ascending {
            self.work_types.sort_by(|a, b| compare(a, b));
        } else {
            self.work_types.sort_by(|a, b| compare(b, a));
        }
    }

    /// Writes every entry as one `name;basePay;bonusPercent` line.
    ///
    /// # Errors
    ///
    /// [`PayrollError::FileOpen`] if the file cannot be created or written.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> PayrollResult<()> {
        let path = path.as_ref();
        let file_error = |e: std::io::Error| PayrollError::FileOpen {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        let mut out = BufWriter::new(File::create(path).map_err(file_error)?);
        for w in &self.work_types {
            let line = interchange::format_record(w.name(), w.base_pay(), w.bonus_percent());
            writeln!(out, "{line}").map_err(file_error)?;
        }
        out.flush().map_err(file_error)?;

        info!(path = %path.display(), count = self.work_types.len(), "Saved work types");
        Ok(())
    }

    /// Replaces the contents with the records read from a file.
    ///
    /// Blank lines are skipped. Each record goes through the same validation
    /// as [`add_work_type`](Self::add_work_type). The file is parsed in full
    /// before anything is replaced: on any error the department keeps its
    /// previous contents.
    ///
    /// # Errors
    ///
    /// - [`PayrollError::FileOpen`] if the file cannot be read
    /// - [`PayrollError::InvalidFormat`] if a line does not have three fields
    /// - [`PayrollError::InvalidNumber`] if a numeric field does not parse
    /// - [`PayrollError::DuplicateWorkType`] or [`PayrollError::InvalidRate`]
    ///   if a record fails validation
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> PayrollResult<()> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| PayrollError::FileOpen {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let mut staged = Self::new();
        for (number, line) in interchange::strip_bom(&content).lines().enumerate() {
            let line_no = number + 1;
            let record = match interchange::parse_record(line) {
                None => continue,
                Some(Ok(record)) => record,
                Some(Err(RecordError::Malformed)) => {
                    warn!(path = %path.display(), line = line_no, "Malformed record");
                    return Err(PayrollError::InvalidFormat { line: line_no });
                }
                Some(Err(RecordError::InvalidNumber { field, value })) => {
                    warn!(path = %path.display(), line = line_no, field, "Invalid number");
                    return Err(PayrollError::InvalidNumber {
                        line: line_no,
                        field,
                        value,
                    });
                }
            };
            staged.add_work_type(&record.name, record.base_pay, record.bonus_percent)?;
        }

        self.work_types = staged.work_types;
        info!(path = %path.display(), count = self.work_types.len(), "Loaded work types");
        Ok(())
    }
}

impl<'a> IntoIterator for &'a PayrollDepartment {
    type Item = &'a WorkType;
    type IntoIter = std::slice::Iter<'a, WorkType>;

    fn into_iter(self) -> Self::IntoIter {
        self.work_types.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BonusStrategy;
    use proptest::prelude::*;

    fn names(department: &PayrollDepartment) -> Vec<&str> {
        department.iter().map(WorkType::name).collect()
    }

    fn department_with(entries: &[(&str, f64, f64)]) -> PayrollDepartment {
        let mut department = PayrollDepartment::new();
        for (name, base_pay, bonus_percent) in entries {
            department.add_work_type(name, *base_pay, *bonus_percent).unwrap();
        }
        department
    }

    #[test]
    fn test_add_appends_in_insertion_order() {
        let department = department_with(&[("B", 10.0, 0.0), ("A", 20.0, 0.0), ("C", 5.0, 0.0)]);
        assert_eq!(names(&department), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_add_computes_final_pay() {
        let department = department_with(&[("Welding", 1000.0, 15.0)]);
        let work = department.get(0).unwrap();
        assert!((work.final_pay() - 1150.0).abs() < 1e-9);
        assert_eq!(work.strategy(), BonusStrategy::Percentage(15.0));
    }

    #[test]
    fn test_add_zero_bonus_uses_no_bonus() {
        let department = department_with(&[("Plain", 300.0, 0.0)]);
        assert_eq!(department.get(0).unwrap().strategy(), BonusStrategy::NoBonus);
    }

    #[test]
    fn test_add_without_bonus_pays_base() {
        let mut department = PayrollDepartment::new();
        department.add_work_type_without_bonus("Sorting", 420.0).unwrap();

        let work = department.get(0).unwrap();
        assert_eq!(work.bonus_percent(), 0.0);
        assert_eq!(work.strategy(), BonusStrategy::NoBonus);
        assert_eq!(work.final_pay(), 420.0);
        assert!(matches!(
            department.add_work_type_without_bonus("Sorting", 1.0),
            Err(PayrollError::DuplicateWorkType { .. })
        ));
    }

    #[test]
    fn test_add_duplicate_leaves_list_unchanged() {
        let mut department = department_with(&[("Welding", 100.0, 0.0)]);
        let result = department.add_work_type("Welding", 999.0, 5.0);

        match result {
            Err(PayrollError::DuplicateWorkType { name }) => assert_eq!(name, "Welding"),
            other => panic!("Expected DuplicateWorkType, got {:?}", other),
        }
        assert_eq!(department.len(), 1);
        assert_eq!(department.get(0).unwrap().base_pay(), 100.0);
    }

    #[test]
    fn test_add_duplicate_is_case_sensitive() {
        let mut department = department_with(&[("welding", 100.0, 0.0)]);
        assert!(department.add_work_type("Welding", 100.0, 0.0).is_ok());
        assert_eq!(department.len(), 2);
    }

    #[test]
    fn test_add_invalid_rate_propagates() {
        let mut department = PayrollDepartment::new();
        assert!(matches!(
            department.add_work_type("Bad", 0.0, 0.0),
            Err(PayrollError::InvalidRate { .. })
        ));
        assert!(matches!(
            department.add_work_type("Bad", 10.0, -2.0),
            Err(PayrollError::InvalidRate { .. })
        ));
        assert!(matches!(
            department.add_work_type("", 10.0, 0.0),
            Err(PayrollError::InvalidRate { .. })
        ));
        assert!(department.is_empty());
    }

    #[test]
    fn test_update_replaces_entry() {
        let mut department = department_with(&[("A", 100.0, 0.0), ("B", 200.0, 0.0)]);
        department.update_work_type(1, "B", 250.0, 10.0).unwrap();

        let updated = department.get(1).unwrap();
        assert_eq!(updated.base_pay(), 250.0);
        assert_eq!(updated.bonus_percent(), 10.0);
        assert!((updated.final_pay() - 275.0).abs() < 1e-9);
    }

    #[test]
    fn test_update_allows_rename() {
        let mut department = department_with(&[("A", 100.0, 0.0), ("B", 200.0, 0.0)]);
        department.update_work_type(0, "Z", 100.0, 0.0).unwrap();
        assert_eq!(names(&department), vec!["Z", "B"]);
    }

    #[test]
    fn test_update_out_of_range_leaves_list_unchanged() {
        let mut department = department_with(&[("A", 100.0, 0.0)]);
        let result = department.update_work_type(1, "X", 1.0, 0.0);

        let error = result.unwrap_err();
        assert!(error.is_general());
        assert!(matches!(
            error,
            PayrollError::IndexOutOfRange { index: 1, len: 1 }
        ));
        assert_eq!(names(&department), vec!["A"]);
    }

    #[test]
    fn test_update_to_other_entrys_name_is_duplicate() {
        let mut department = department_with(&[("A", 100.0, 0.0), ("B", 200.0, 0.0)]);
        assert!(matches!(
            department.update_work_type(0, "B", 100.0, 0.0),
            Err(PayrollError::DuplicateWorkType { .. })
        ));
        assert_eq!(names(&department), vec!["A", "B"]);
    }

    #[test]
    fn test_update_invalid_rate_leaves_entry() {
        let mut department = department_with(&[("A", 100.0, 0.0)]);
        assert!(department.update_work_type(0, "A", -1.0, 0.0).is_err());
        assert_eq!(department.get(0).unwrap().base_pay(), 100.0);
    }

    #[test]
    fn test_remove_preserves_relative_order() {
        let mut department =
            department_with(&[("A", 1.0, 0.0), ("B", 2.0, 0.0), ("C", 3.0, 0.0), ("D", 4.0, 0.0)]);
        let removed = department.remove_work_type(1).unwrap();

        assert_eq!(removed.name(), "B");
        assert_eq!(names(&department), vec!["A", "C", "D"]);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut department = PayrollDepartment::new();
        assert!(matches!(
            department.remove_work_type(0),
            Err(PayrollError::IndexOutOfRange { index: 0, len: 0 })
        ));
    }

    #[test]
    fn test_clear_empties() {
        let mut department = department_with(&[("A", 1.0, 0.0), ("B", 2.0, 0.0)]);
        department.clear();
        assert!(department.is_empty());
        department.clear();
        assert!(department.is_empty());
    }

    #[test]
    fn test_average_of_empty_is_error() {
        let department = PayrollDepartment::new();
        assert!(matches!(
            department.calculate_average_pay(),
            Err(PayrollError::EmptyWorkList { .. })
        ));
    }

    #[test]
    fn test_average_of_final_pays() {
        let department = department_with(&[("A", 100.0, 0.0), ("B", 200.0, 0.0)]);
        assert_eq!(department.calculate_average_pay().unwrap(), 150.0);
    }

    #[test]
    fn test_average_uses_bonus_adjusted_pay() {
        let department = department_with(&[("A", 100.0, 100.0), ("B", 100.0, 0.0)]);
        assert!((department.calculate_average_pay().unwrap() - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_sort_by_name_both_directions() {
        let mut department = department_with(&[("b", 1.0, 0.0), ("C", 1.0, 0.0), ("a", 1.0, 0.0)]);

        department.sort_by_name(true);
        assert_eq!(names(&department), vec!["C", "a", "b"]);

        department.sort_by_name(false);
        assert_eq!(names(&department), vec!["b", "a", "C"]);
    }

    #[test]
    fn test_sort_by_final_pay_is_stable() {
        let mut department = department_with(&[
            ("first", 100.0, 0.0),
            ("cheap", 50.0, 0.0),
            ("second", 50.0, 100.0),
            ("third", 100.0, 0.0),
        ]);

        department.sort_by_final_pay(true);
        assert_eq!(names(&department), vec!["cheap", "first", "second", "third"]);

        department.sort_by_final_pay(false);
        assert_eq!(names(&department), vec!["first", "second", "third", "cheap"]);
    }

    #[test]
    fn test_find_by_name() {
        let department = department_with(&[("A", 1.0, 0.0), ("B", 2.0, 0.0)]);
        let (index, work) = department.find_by_name("B").unwrap();
        assert_eq!(index, 1);
        assert_eq!(work.base_pay(), 2.0);
        assert!(department.find_by_name("b").is_none());
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("work_types.txt");

        let department = department_with(&[("Welding", 1000.0, 10.0), ("Painting", 850.5, 0.0)]);
        department.save_to_file(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Welding;1000;10\nPainting;850.5;0\n");

        let mut loaded = department_with(&[("Stale", 1.0, 0.0)]);
        loaded.load_from_file(&path).unwrap();
        assert_eq!(names(&loaded), vec!["Welding", "Painting"]);
        assert_eq!(loaded.get(1).unwrap().base_pay(), 850.5);
    }

    #[test]
    fn test_load_skips_blank_lines_and_trims() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("work_types.txt");
        fs::write(&path, "\n  A ; 100 ; 5 \r\n\n\tB;200;0\n   \n").unwrap();

        let mut department = PayrollDepartment::new();
        department.load_from_file(&path).unwrap();
        assert_eq!(names(&department), vec!["A", "B"]);
        assert_eq!(department.get(0).unwrap().bonus_percent(), 5.0);
    }

    #[test]
    fn test_load_missing_file_is_file_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut department = department_with(&[("Keep", 1.0, 0.0)]);

        let result = department.load_from_file(dir.path().join("missing.txt"));
        assert!(matches!(result, Err(PayrollError::FileOpen { .. })));
        assert_eq!(names(&department), vec!["Keep"]);
    }

    #[test]
    fn test_load_malformed_line_keeps_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("work_types.txt");
        fs::write(&path, "A;100;0\nB;200\n").unwrap();

        let mut department = department_with(&[("Keep", 1.0, 0.0)]);
        let result = department.load_from_file(&path);

        assert!(matches!(result, Err(PayrollError::InvalidFormat { line: 2 })));
        assert_eq!(names(&department), vec!["Keep"]);
    }

    #[test]
    fn test_load_empty_last_field_is_invalid_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("work_types.txt");
        fs::write(&path, "A;100;0\nB;200;\n").unwrap();

        let mut department = department_with(&[("Keep", 1.0, 0.0)]);
        let result = department.load_from_file(&path);

        assert!(matches!(result, Err(PayrollError::InvalidFormat { line: 2 })));
        assert_eq!(names(&department), vec!["Keep"]);
    }

    #[test]
    fn test_load_bad_number_keeps_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("work_types.txt");
        fs::write(&path, "A;100;0\nB;bad;0\n").unwrap();

        let mut department = department_with(&[("Keep", 1.0, 0.0)]);
        let result = department.load_from_file(&path);

        match result {
            Err(PayrollError::InvalidNumber { line, field, value }) => {
                assert_eq!(line, 2);
                assert_eq!(field, "base pay");
                assert_eq!(value, "bad");
            }
            other => panic!("Expected InvalidNumber, got {:?}", other),
        }
        assert_eq!(names(&department), vec!["Keep"]);
    }

    #[test]
    fn test_load_duplicate_in_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("work_types.txt");
        fs::write(&path, "A;100;0\nA;200;0\n").unwrap();

        let mut department = PayrollDepartment::new();
        assert!(matches!(
            department.load_from_file(&path),
            Err(PayrollError::DuplicateWorkType { .. })
        ));
        assert!(department.is_empty());
    }

    proptest! {
        #[test]
        fn prop_sort_by_name_directions_are_reverses(
            names_in in proptest::collection::hash_set("[a-zA-Z]{1,8}", 0..20),
        ) {
            let mut department = PayrollDepartment::new();
            for name in &names_in {
                department.add_work_type(name, 10.0, 0.0).unwrap();
            }

            department.sort_by_name(true);
            let ascending: Vec<String> = department.iter().map(|w| w.name().to_string()).collect();
            department.sort_by_name(false);
            let mut descending: Vec<String> = department.iter().map(|w| w.name().to_string()).collect();
            descending.reverse();

            prop_assert_eq!(ascending, descending);
        }

        #[test]
        fn prop_sort_by_final_pay_keeps_tie_order(
            pays in proptest::collection::vec(1u32..5, 1..30),
        ) {
            let mut department = PayrollDepartment::new();
            for (i, pay) in pays.iter().enumerate() {
                department.add_work_type(&format!("w{i:03}"), f64::from(*pay), 0.0).unwrap();
            }

            department.sort_by_final_pay(false);
            let sorted: Vec<(f64, String)> = department
                .iter()
                .map(|w| (w.final_pay(), w.name().to_string()))
                .collect();

            for pair in sorted.windows(2) {
                prop_assert!(pair[0].0 >= pair[1].0);
                if pair[0].0 == pair[1].0 {
                    prop_assert!(pair[0].1 < pair[1].1);
                }
            }
        }
    }
}
