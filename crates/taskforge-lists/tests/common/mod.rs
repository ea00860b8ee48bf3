//! Behaviour every list backend must share.
//!
//! Each integration test file instantiates [`list_suite!`] with a constructor
//! for its backend.

#![allow(dead_code, unused_macros)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use taskforge_lists::{List, ListError, Note, Task};

pub fn date(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2018, 1, day)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// Asserts `found` holds exactly the `expected` tasks, in any order.
pub fn assert_same_tasks(found: &[Task], expected: &[&Task]) {
    let mut found_ids: Vec<&str> = found.iter().map(|t| t.id.as_str()).collect();
    let mut expected_ids: Vec<&str> = expected.iter().map(|t| t.id.as_str()).collect();
    found_ids.sort_unstable();
    expected_ids.sort_unstable();
    assert_eq!(
        found_ids,
        expected_ids,
        "found {:?}",
        found.iter().map(|t| &t.title).collect::<Vec<_>>()
    );
}

fn run_query(list: &mut dyn List, query: &str, fixture: &[Task]) -> Vec<Task> {
    list.add_multiple(fixture).expect("failed to add fixture");
    list.query(query)
        .unwrap_or_else(|e| panic!("query {query:?} failed: {e}"))
}

fn five_tasks() -> Vec<Task> {
    vec![
        Task::new("task 1"),
        Task::new("task 2"),
        Task::new("other task").with_context("other"),
        Task::new("task 3"),
        Task::new("task 4"),
    ]
}

pub fn add_one_and_find_by_id(list: &mut dyn List) {
    let task = Task::new("task 1").with_body("details").with_priority(2.5);
    list.add(&task).unwrap();

    let found = list.find_by_id(&task.id).unwrap();
    assert_eq!(found, task);
    assert_eq!(found.title, "task 1");
    assert_eq!(found.body, "details");
    assert_eq!(found.priority, 2.5);
    assert_eq!(found.created_date, task.created_date);
    assert_eq!(found.completed_date, None);
}

pub fn add_multiple_keeps_order(list: &mut dyn List) {
    let fixture = vec![Task::new("task 1"), Task::new("task 2"), Task::new("task 3")];
    list.add_multiple(&fixture).unwrap();
    assert_eq!(list.list().unwrap(), fixture);
}

pub fn find_missing_task(list: &mut dyn List) {
    let err = list.find_by_id("does-not-exist").unwrap_err();
    assert!(matches!(err, ListError::NotFound { ref id } if id == "does-not-exist"));
}

pub fn complete_a_task(list: &mut dyn List) {
    let task = Task::new("task to complete");
    list.add(&task).unwrap();
    list.complete(&task.id).unwrap();
    assert!(list.find_by_id(&task.id).unwrap().is_completed());

    assert!(matches!(
        list.complete("does-not-exist"),
        Err(ListError::NotFound { .. })
    ));
}

pub fn current_task(list: &mut dyn List) {
    let tasks = vec![Task::new("task 1"), Task::new("task 2")];
    list.add_multiple(&tasks).unwrap();

    assert_eq!(list.current().unwrap(), tasks[0]);
    list.complete(&tasks[0].id).unwrap();
    assert_eq!(list.current().unwrap(), tasks[1]);
    list.complete(&tasks[1].id).unwrap();
    assert!(matches!(list.current(), Err(ListError::NoCurrentTask)));
}

pub fn current_prefers_priority_then_age(list: &mut dyn List) {
    let old = Task::new("old").with_created_date(date(1));
    let new = Task::new("new").with_created_date(date(2));
    let urgent = Task::new("urgent")
        .with_priority(3.0)
        .with_created_date(date(3));
    list.add_multiple(&[new.clone(), old.clone(), urgent.clone()]).unwrap();

    assert_eq!(list.current().unwrap(), urgent);
    list.complete(&urgent.id).unwrap();
    assert_eq!(list.current().unwrap(), old);
}

pub fn add_a_note(list: &mut dyn List) {
    let task = Task::new("task to be noted");
    list.add(&task).unwrap();

    let note = Note::new("a note");
    list.add_note(&task.id, &note).unwrap();

    let noted = list.find_by_id(&task.id).unwrap();
    assert_eq!(noted.notes, vec![note.clone()]);
    assert_eq!(noted.notes[0].body, "a note");

    assert!(matches!(
        list.add_note("does-not-exist", &note),
        Err(ListError::NotFound { .. })
    ));
}

pub fn update_a_task(list: &mut dyn List) {
    let task = Task::new("task to update");
    list.add(&task).unwrap();

    let mut to_update = list.find_by_id(&task.id).unwrap();
    to_update.title = "task updated".to_string();
    to_update.priority = 4.0;
    list.update(&to_update).unwrap();

    let updated = list.find_by_id(&task.id).unwrap();
    assert_eq!(updated.title, "task updated");
    assert_eq!(updated.priority, 4.0);

    assert!(matches!(
        list.update(&Task::new("never added")),
        Err(ListError::NotFound { .. })
    ));
}

pub fn query_simple_title(list: &mut dyn List) {
    let fixture = vec![Task::new("task 1"), Task::new("task 2")];
    let found = run_query(list, "title = \"task 1\"", &fixture);
    assert_same_tasks(&found, &[&fixture[0]]);
}

pub fn query_other_context(list: &mut dyn List) {
    let fixture = five_tasks();
    let found = run_query(list, "context = other", &fixture);
    assert_same_tasks(&found, &[&fixture[2]]);
}

pub fn query_multiple_ors(list: &mut dyn List) {
    let fixture = five_tasks();
    let found = run_query(
        list,
        "title = \"task 4\" or title = \"task 1\" or title = \"other task\"",
        &fixture,
    );
    assert_same_tasks(&found, &[&fixture[0], &fixture[4], &fixture[2]]);
}

pub fn query_grouped_expressions(list: &mut dyn List) {
    let fixture = five_tasks();
    let found = run_query(
        list,
        "(title = \"task 1\" and context = \"default\") or (context = \"other\")",
        &fixture,
    );
    assert_same_tasks(&found, &[&fixture[0], &fixture[2]]);
}

pub fn query_string_literal_only(list: &mut dyn List) {
    let fixture = five_tasks();
    let found = run_query(list, "task", &fixture);
    assert_same_tasks(&found, &fixture.iter().collect::<Vec<_>>());
}

pub fn query_priority_equals(list: &mut dyn List) {
    let fixture = five_tasks();
    let found = run_query(list, "priority = 1.0", &fixture);
    assert_same_tasks(&found, &fixture.iter().collect::<Vec<_>>());
}

pub fn query_priority_greater(list: &mut dyn List) {
    let mut fixture = five_tasks();
    fixture[2].priority = 2.0;
    let found = run_query(list, "priority > 1", &fixture);
    assert_same_tasks(&found, &[&fixture[2]]);
}

pub fn query_completed(list: &mut dyn List) {
    let fixture = vec![
        Task::new("task 1"),
        Task::new("task 2").with_completed_date(date(5)),
        Task::new("other task").with_context("other").with_priority(2.0),
        Task::new("task 3").with_completed_date(date(6)),
        Task::new("task 4"),
    ];
    list.add_multiple(&fixture).unwrap();

    let open = list.query("completed = false").unwrap();
    assert_same_tasks(&open, &[&fixture[0], &fixture[2], &fixture[4]]);

    let done = list.query("completed = true").unwrap();
    assert_same_tasks(&done, &[&fixture[1], &fixture[3]]);

    let not_done = list.query("completed != true").unwrap();
    assert_same_tasks(&not_done, &[&fixture[0], &fixture[2], &fixture[4]]);
}

pub fn query_free_text_searches_body_and_notes(list: &mut dyn List) {
    let mut in_note = Task::new("groceries");
    in_note.notes.push(Note::new("remember the MILK"));
    let fixture = vec![
        Task::new("buy milk"),
        Task::new("errands").with_body("pick up milk on the way"),
        in_note,
        Task::new("walk the dog"),
    ];

    let found = run_query(list, "milk", &fixture);
    assert_same_tasks(&found, &[&fixture[0], &fixture[1], &fixture[2]]);
}

pub fn query_like_is_literal_and_case_insensitive(list: &mut dyn List) {
    let fixture = vec![
        Task::new("Take out the TRASH"),
        Task::new("100% done"),
        Task::new("100 percent done"),
        Task::new("a.b"),
        Task::new("axb"),
    ];
    list.add_multiple(&fixture).unwrap();

    assert_same_tasks(&list.query("title ~ trash").unwrap(), &[&fixture[0]]);
    assert_same_tasks(&list.query("title ~ '% done'").unwrap(), &[&fixture[1]]);
    assert_same_tasks(&list.query("title ~ 'a.b'").unwrap(), &[&fixture[3]]);
    assert_same_tasks(
        &list.query("title !~ done").unwrap(),
        &[&fixture[0], &fixture[3], &fixture[4]],
    );
}

pub fn query_dates(list: &mut dyn List) {
    let fixture = vec![
        Task::new("old").with_created_date(date(1)),
        Task::new("middle").with_created_date(date(2)),
        Task::new("new").with_created_date(date(3) + Duration::hours(1)),
    ];
    list.add_multiple(&fixture).unwrap();

    assert_same_tasks(
        &list.query("created_date > '2018-01-02'").unwrap(),
        &[&fixture[1], &fixture[2]],
    );
    assert_same_tasks(
        &list.query("created_date <= '2018-01-02 12:00 PM'").unwrap(),
        &[&fixture[0], &fixture[1]],
    );
    assert_same_tasks(
        &list.query("created_date = '2018-01-03 13:00:00'").unwrap(),
        &[&fixture[2]],
    );
}

pub fn query_not_equal(list: &mut dyn List) {
    let fixture = five_tasks();
    let found = run_query(list, "context != default", &fixture);
    assert_same_tasks(&found, &[&fixture[2]]);
}

pub fn query_take_out_the_trash(list: &mut dyn List) {
    let fixture = vec![
        Task::new("please take out the trash").with_priority(6.0),
        Task::new("take out the trash").with_priority(1.0),
    ];
    let found = run_query(
        list,
        "priority > 5 and title ~ 'take out the trash'",
        &fixture,
    );
    assert_same_tasks(&found, &[&fixture[0]]);
}

pub fn blank_query_lists_everything(list: &mut dyn List) {
    let fixture = five_tasks();
    let found = run_query(list, "   ", &fixture);
    assert_eq!(found, fixture);
}

pub fn bad_queries_are_errors(list: &mut dyn List) {
    list.add(&Task::new("task 1")).unwrap();
    assert!(matches!(list.query("(a = 1"), Err(ListError::Query(_))));
    assert!(matches!(list.query("colour = red"), Err(ListError::Query(_))));
    assert!(matches!(list.query("priority = high"), Err(ListError::Query(_))));
    assert_eq!(
        list.query("colour = red").unwrap_err().to_string(),
        "invalid query: unknown field: colour"
    );
}

pub fn duplicate_ids_are_rejected(list: &mut dyn List) {
    let task = Task::new("task 1");
    list.add(&task).unwrap();

    let err = list.add(&task.clone().with_priority(3.0)).unwrap_err();
    assert!(matches!(err, ListError::DuplicateId { ref id } if *id == task.id));

    let other = Task::new("task 2");
    let err = list
        .add_multiple(&[other.clone(), other.clone()])
        .unwrap_err();
    assert!(matches!(err, ListError::DuplicateId { ref id } if *id == other.id));

    let stored = list.list().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].priority, task.priority);
}

/// Generates one `#[test]` per shared check for a backend constructor.
macro_rules! list_suite {
    ($make:expr; $($check:ident),* $(,)?) => {
        $(
            #[test]
            fn $check() {
                let mut list = $make;
                common::$check(&mut list);
            }
        )*
    };
    ($make:expr) => {
        list_suite!(
            $make;
            add_one_and_find_by_id,
            add_multiple_keeps_order,
            find_missing_task,
            complete_a_task,
            current_task,
            current_prefers_priority_then_age,
            add_a_note,
            update_a_task,
            query_simple_title,
            query_other_context,
            query_multiple_ors,
            query_grouped_expressions,
            query_string_literal_only,
            query_priority_equals,
            query_priority_greater,
            query_completed,
            query_free_text_searches_body_and_notes,
            query_like_is_literal_and_case_insensitive,
            query_dates,
            query_not_equal,
            query_take_out_the_trash,
            blank_query_lists_everything,
            bad_queries_are_errors,
            duplicate_ids_are_rejected,
        );
    };
}
