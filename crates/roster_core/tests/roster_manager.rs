use chrono::NaiveDate;
use roster_core::db::DbError;
use roster_core::{
    Employee, EmployeeId, EmployeeStore, EmployeeValidationError, NewEmployee, RosterError,
    RosterManager, SqliteEmployeeStore, StoreError, StoreErrorKind, StoreResult,
};
use std::cell::Cell;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn snapshot<S: EmployeeStore>(roster: &RosterManager<S>) -> Vec<(usize, Employee)> {
    roster
        .view()
        .map(|row| (row.position, row.employee.clone()))
        .collect()
}

/// SQLite store that can be told to fail individual operations.
struct FlakyStore {
    inner: SqliteEmployeeStore,
    fail_insert: Cell<bool>,
    fail_delete: Cell<bool>,
    fail_scan: Cell<bool>,
}

impl FlakyStore {
    fn new() -> Self {
        Self {
            inner: SqliteEmployeeStore::open_in_memory().unwrap(),
            fail_insert: Cell::new(false),
            fail_delete: Cell::new(false),
            fail_scan: Cell::new(false),
        }
    }
}

fn injected() -> DbError {
    DbError::Io(std::io::Error::other("injected failure"))
}

impl EmployeeStore for FlakyStore {
    fn initialize(&self) -> StoreResult<()> {
        self.inner.initialize()
    }

    fn insert(&self, employee: &NewEmployee) -> StoreResult<EmployeeId> {
        if self.fail_insert.get() {
            return Err(StoreError::WriteFailed(injected()));
        }
        self.inner.insert(employee)
    }

    fn delete_by_id(&self, id: EmployeeId) -> StoreResult<bool> {
        if self.fail_delete.get() {
            return Err(StoreError::WriteFailed(injected()));
        }
        self.inner.delete_by_id(id)
    }

    fn scan_all(&self) -> StoreResult<Vec<Employee>> {
        if self.fail_scan.get() {
            return Err(StoreError::ReadFailed(injected()));
        }
        self.inner.scan_all()
    }
}

#[test]
fn add_to_empty_store_yields_single_row() {
    let mut roster = RosterManager::open_in_memory().unwrap();
    assert!(roster.is_empty());

    let id = roster.add("Ann Lee", "02.05.1990", "5000.00").unwrap();

    let rows = snapshot(&roster);
    assert_eq!(rows.len(), 1);
    let (position, employee) = &rows[0];
    assert_eq!(*position, 1);
    assert_eq!(employee.id, id);
    assert_eq!(employee.name, "Ann Lee");
    assert_eq!(employee.birth_date, date(1990, 5, 2));
    assert_eq!(employee.salary, 5000.0);
}

#[test]
fn delete_renumbers_positions_but_keeps_identifiers() {
    let mut roster = RosterManager::open_in_memory().unwrap();
    let first = roster.add("Ann Lee", "02.05.1990", "5000").unwrap();
    let second = roster.add("Bob Stone", "30.11.1985", "4200.50").unwrap();

    roster.delete(first).unwrap();

    let rows = snapshot(&roster);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0, 1);
    assert_eq!(rows[0].1.id, second);
    assert_eq!(rows[0].1.name, "Bob Stone");
    assert!(roster.get(first).is_none());
}

#[test]
fn deleting_absent_identifier_is_noop() {
    let mut roster = RosterManager::open_in_memory().unwrap();
    let id = roster.add("Ann Lee", "02.05.1990", "5000").unwrap();
    let before = snapshot(&roster);

    roster.delete(id + 42).unwrap();
    assert_eq!(snapshot(&roster), before);

    roster.delete(id).unwrap();
    roster.delete(id).unwrap();
    assert!(roster.is_empty());
}

#[test]
fn view_stays_ordered_by_identifier_across_deletes() {
    let mut roster = RosterManager::open_in_memory().unwrap();
    let mut ids = Vec::new();
    for (index, name) in ["A", "B", "C", "D", "E"].iter().enumerate() {
        let salary = format!("{}", 1000 * (index + 1));
        ids.push(roster.add(name, "01.01.1980", &salary).unwrap());
    }
    roster.delete(ids[1]).unwrap();
    roster.delete(ids[3]).unwrap();
    roster.add("F", "01.01.1980", "6000").unwrap();

    let rows = snapshot(&roster);
    let names: Vec<&str> = rows.iter().map(|(_, e)| e.name.as_str()).collect();
    assert_eq!(names, vec!["A", "C", "E", "F"]);
    assert!(rows.windows(2).all(|pair| pair[0].1.id < pair[1].1.id));
    let positions: Vec<usize> = rows.iter().map(|(p, _)| *p).collect();
    assert_eq!(positions, vec![1, 2, 3, 4]);
}

#[test]
fn view_matches_fresh_load_after_mutations() {
    let mut roster = RosterManager::open_in_memory().unwrap();
    roster.add("Ann Lee", "02.05.1990", "5000").unwrap();
    let id = roster.add("Bob Stone", "30.11.1985", "4200.5").unwrap();
    roster.add("Cy Park", "15.07.2001", "0").unwrap();
    roster.delete(id).unwrap();

    let in_memory = roster.employees().to_vec();
    assert_eq!(roster.store().scan_all().unwrap(), in_memory);

    roster.load().unwrap();
    assert_eq!(roster.employees(), in_memory.as_slice());
}

#[test]
fn validation_failures_leave_view_unchanged() {
    let mut roster = RosterManager::open_in_memory().unwrap();
    roster.add("Ann Lee", "02.05.1990", "5000").unwrap();
    let before = snapshot(&roster);

    let empty = roster.add("", "02.05.1990", "5000").unwrap_err();
    assert!(matches!(
        empty,
        RosterError::Validation(EmployeeValidationError::EmptyName)
    ));

    let blank = roster.add("   ", "02.05.1990", "5000").unwrap_err();
    assert_eq!(blank.code(), "empty_name");

    let bad_date = roster.add("Bob", "31-13-2024", "5000").unwrap_err();
    assert!(matches!(
        bad_date,
        RosterError::Validation(EmployeeValidationError::BadDate(_))
    ));

    let bad_salary = roster.add("Bob", "02.05.1990", "-5").unwrap_err();
    assert!(matches!(
        bad_salary,
        RosterError::Validation(EmployeeValidationError::BadSalary(_))
    ));

    assert_eq!(snapshot(&roster), before);
    assert_eq!(roster.store().scan_all().unwrap().len(), 1);
}

#[test]
fn names_are_stored_exactly_as_entered() {
    let mut roster = RosterManager::open_in_memory().unwrap();
    let id = roster.add("  Ann Lee ", "02.05.1990", "5000").unwrap();
    assert_eq!(roster.get(id).unwrap().name, "  Ann Lee ");
    assert_eq!(roster.store().scan_all().unwrap()[0].name, "  Ann Lee ");
}

#[test]
fn single_digit_day_and_month_are_accepted() {
    let mut roster = RosterManager::open_in_memory().unwrap();
    let id = roster.add("Ann Lee", "2.5.1990", "5000").unwrap();
    assert_eq!(roster.get(id).unwrap().birth_date, date(1990, 5, 2));
}

#[test]
fn failed_insert_skips_reload_and_keeps_view() {
    let mut roster = RosterManager::initialize(FlakyStore::new()).unwrap();
    roster.add("Ann Lee", "02.05.1990", "5000").unwrap();
    let before = snapshot(&roster);

    roster.store().fail_insert.set(true);
    let err = roster.add("Bob Stone", "30.11.1985", "4200").unwrap_err();
    assert!(matches!(&err, RosterError::Store(e) if e.kind() == StoreErrorKind::WriteFailed));
    assert_eq!(err.code(), "write_failed");

    assert_eq!(snapshot(&roster), before);
    assert!(!roster.is_stale());
}

#[test]
fn failed_delete_keeps_view() {
    let mut roster = RosterManager::initialize(FlakyStore::new()).unwrap();
    let id = roster.add("Ann Lee", "02.05.1990", "5000").unwrap();
    let before = snapshot(&roster);

    roster.store().fail_delete.set(true);
    let err = roster.delete(id).unwrap_err();
    assert_eq!(err.code(), "write_failed");
    assert_eq!(snapshot(&roster), before);
}

#[test]
fn failed_reload_after_insert_marks_view_stale_until_next_load() {
    let mut roster = RosterManager::initialize(FlakyStore::new()).unwrap();
    roster.add("Ann Lee", "02.05.1990", "5000").unwrap();
    let before = snapshot(&roster);

    roster.store().fail_scan.set(true);
    let err = roster.add("Bob Stone", "30.11.1985", "4200").unwrap_err();
    assert!(matches!(&err, RosterError::Store(e) if e.kind() == StoreErrorKind::ReadFailed));
    assert!(roster.is_stale());
    assert_eq!(snapshot(&roster), before);

    roster.store().fail_scan.set(false);
    roster.load().unwrap();
    assert!(!roster.is_stale());
    assert_eq!(roster.len(), 2);
    assert_eq!(roster.employees()[1].name, "Bob Stone");
}

#[test]
fn failed_reload_after_delete_marks_view_stale_until_next_load() {
    let mut roster = RosterManager::initialize(FlakyStore::new()).unwrap();
    let first = roster.add("Ann Lee", "02.05.1990", "5000").unwrap();
    let second = roster.add("Bob Stone", "30.11.1985", "4200").unwrap();
    let before = snapshot(&roster);

    roster.store().fail_scan.set(true);
    let err = roster.delete(first).unwrap_err();
    assert!(matches!(&err, RosterError::Store(e) if e.kind() == StoreErrorKind::ReadFailed));
    assert!(roster.is_stale());
    assert_eq!(snapshot(&roster), before);

    roster.store().fail_scan.set(false);
    roster.load().unwrap();
    assert!(!roster.is_stale());
    assert_eq!(roster.len(), 1);
    assert!(roster.get(first).is_none());
    assert_eq!(roster.employees()[0].id, second);
}

#[test]
fn corrupt_row_fails_load_without_touching_list() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("employees.db");

    let mut roster = RosterManager::open(&path).unwrap();
    roster.add("Ann Lee", "02.05.1990", "5000").unwrap();
    let before = snapshot(&roster);

    roster
        .store()
        .connection()
        .execute(
            "INSERT INTO employees (name, birth_date, salary) VALUES ('Bad Row', 'not-a-date', 1.0);",
            [],
        )
        .unwrap();

    let err = roster.load().unwrap_err();
    assert_eq!(err.code(), "corrupt_row");
    assert_eq!(snapshot(&roster), before);
}

#[test]
fn initialize_twice_on_same_file_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("employees.db");

    let mut first = RosterManager::open(&path).unwrap();
    first.add("Ann Lee", "02.05.1990", "5000").unwrap();
    first.add("Bob Stone", "30.11.1985", "4200").unwrap();
    let expected = first.employees().to_vec();
    drop(first);

    let second = RosterManager::open(&path).unwrap();
    assert_eq!(second.employees(), expected.as_slice());

    let third = RosterManager::open(&path).unwrap();
    assert_eq!(third.employees(), expected.as_slice());
}

#[test]
fn initialize_reports_unavailable_storage() {
    let dir = tempfile::tempdir().unwrap();
    let err = match RosterManager::open(dir.path()) {
        Ok(_) => panic!("a directory is not a database"),
        Err(err) => err,
    };
    assert_eq!(err.code(), "storage_unavailable");
}

#[test]
fn add_employee_accepts_typed_payload() {
    let mut roster = RosterManager::open_in_memory().unwrap();
    let payload = NewEmployee::new("Ann Lee", date(1990, 5, 2), 5000.0).unwrap();

    let id = roster.add_employee(&payload).unwrap();
    assert_eq!(roster.get(id).unwrap().birth_date, date(1990, 5, 2));
}
