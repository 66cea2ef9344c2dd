use chrono::{Days, NaiveDate};
use dayplan_core::{
    AddToTodayRepository, CreateTaskRepository, DeleteTaskRepository, EditTemplateRepository,
    EditTodayRepository, FixedClock, GoalRef, InMemoryGoalDirectory, MarkCompleteRepository,
    OverdueTaskRepository, Priority, RemoveFromTodayRepository, TaskCategoryRepository,
    TaskBook, TaskContext, TaskInfo, TaskTemplate,
};
use std::collections::HashSet;
use std::sync::Arc;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

fn days_ago(days: u64) -> NaiveDate {
    today().checked_sub_days(Days::new(days)).unwrap()
}

fn setup() -> (TaskContext, Arc<FixedClock>, Arc<InMemoryGoalDirectory>) {
    let clock = Arc::new(FixedClock::new(today()));
    let goals = Arc::new(InMemoryGoalDirectory::default());
    let context = TaskContext::new(TaskBook::new(), clock.clone(), goals.clone());
    (context, clock, goals)
}

fn template(name: &str, category: Option<&str>) -> TaskTemplate {
    TaskTemplate::new(TaskInfo::new(name, "", category).unwrap(), None, false)
}

/// Mirrors the caller contract: check uniqueness, then save.
fn save_if_unique(context: &TaskContext, candidate: TaskTemplate) -> bool {
    let create = context.create();
    let info = candidate.info();
    if create.task_exists_with_name_and_category(info.name(), Some(info.category())) {
        return false;
    }
    create.save_task_available(candidate);
    true
}

#[test]
fn duplicate_name_with_equivalent_empty_category_is_rejected() {
    let (context, _, _) = setup();

    assert!(save_if_unique(&context, template("Gym", Some(""))));
    assert!(context
        .create()
        .task_exists_with_name_and_category("gym", None));
    assert!(!save_if_unique(&context, template("gym", None)));
    assert!(save_if_unique(&context, template("gym", Some("health"))));

    let templates = context.create().get_all_available_task_templates();
    let keys: HashSet<(String, String)> = templates
        .iter()
        .map(|t| {
            (
                t.info().name().to_lowercase(),
                t.info().category().to_lowercase(),
            )
        })
        .collect();
    assert_eq!(keys.len(), templates.len());
}

#[test]
fn backfilled_instance_starts_overdue() {
    let (context, _, _) = setup();
    let gym = template("Gym", None);
    context.create().save_task_available(gym.clone());

    let instance = context
        .add_to_today()
        .add_task_to_today(&gym, Some(Priority::High), Some(days_ago(1)));

    assert_eq!(instance.begin_date(), days_ago(1));
    assert!(instance.is_overdue(today()));
    assert_eq!(instance.template_task_id(), gym.id());
    assert_ne!(instance.id(), gym.id());
}

#[test]
fn template_edit_propagates_only_to_its_own_instances() {
    let (context, _, _) = setup();
    let gym = template("Gym", Some("health"));
    let read = template("Read", Some("study"));
    context.create().save_task_available(gym.clone());
    context.create().save_task_available(read.clone());

    let add = context.add_to_today();
    let gym_today = add.add_task_to_today(&gym, None, None);
    let gym_tomorrow = add.add_task_to_today(&gym, Some(Priority::Low), today().succ_opt());
    let read_today = add.add_task_to_today(&read, None, None);

    assert!(context
        .edit_template()
        .update_available_task(gym.id(), "Weights", "upper body", None, true));

    let edit_today = context.edit_today();
    for id in [gym_today.id(), gym_tomorrow.id()] {
        let instance = edit_today.get_today_task_by_id(id).unwrap();
        assert_eq!(instance.info().name(), "Weights");
        assert_eq!(instance.info().description(), "upper body");
        assert_eq!(instance.info().category(), "");
        assert!(instance.is_one_time());
    }
    assert_eq!(edit_today.get_today_task_by_id(read_today.id()), Some(read_today));

    let stored = context.create().get_task_available_by_id(gym.id()).unwrap();
    assert_eq!(stored.info().name(), "Weights");
    assert!(stored.is_one_time());
}

#[test]
fn instance_edits_do_not_leak_back_to_template() {
    let (context, _, _) = setup();
    let gym = template("Gym", None);
    context.create().save_task_available(gym.clone());
    let instance = context.add_to_today().add_task_to_today(&gym, None, None);

    assert!(context.categories().update_todays_task_category(instance.id(), Some("health")));
    assert!(context
        .edit_today()
        .update_today_task_priority_and_due_date(instance.id(), Some(Priority::High), None));

    let stored = context.create().get_task_available_by_id(gym.id()).unwrap();
    assert_eq!(stored, gym);
}

#[test]
fn category_cascade_clears_exactly_the_referencing_records() {
    let (context, _, _) = setup();
    let report = template("Report", Some("Work"));
    let email = template("Email", Some("Work"));
    let gym = template("Gym", Some("Health"));
    for t in [&report, &email, &gym] {
        context.create().save_task_available(t.clone());
    }
    let add = context.add_to_today();
    add.add_task_to_today(&report, None, None);
    add.add_task_to_today(&gym, None, None);

    let categories = context.categories();
    assert_eq!(categories.find_available_tasks_by_category(Some("Work")).len(), 2);
    assert_eq!(categories.find_todays_tasks_by_category(Some("Work")).len(), 1);

    let report_counts = categories.clear_category_references("Work");
    assert_eq!(report_counts.templates, 2);
    assert_eq!(report_counts.instances, 1);
    assert_eq!(report_counts.total(), 3);

    assert_eq!(categories.find_available_tasks_with_empty_category().len(), 2);
    assert_eq!(categories.find_todays_tasks_with_empty_category().len(), 1);
    assert!(categories.find_available_tasks_by_category(Some("Work")).is_empty());
    assert_eq!(categories.find_available_tasks_by_category(Some("Health")).len(), 1);
    assert_eq!(categories.find_todays_tasks_by_category(Some("Health")).len(), 1);
}

#[test]
fn goal_targeted_template_cannot_be_deleted() {
    let (context, _, goals) = setup();
    let report = template("Report", None);
    context.create().save_task_available(report.clone());
    context.add_to_today().add_task_to_today(&report, None, None);
    goals.add_goal(GoalRef::new(report.id(), "Finish Q4 report"));

    let delete = context.delete();
    assert!(!delete.delete_task_completely(report.id()));
    assert_eq!(
        delete.get_goal_names_targeting_task(report.id()),
        vec!["Finish Q4 report".to_string()]
    );
    assert!(delete.exists_in_available(&report));
    assert!(delete.template_exists_in_today(report.id()));
    assert_eq!(delete.get_todays_tasks_by_template(report.id()).len(), 1);

    goals.remove_goals_targeting(report.id());
    assert!(delete.delete_task_completely(report.id()));
    assert!(!delete.exists_in_available(&report));
    assert!(delete.get_all_todays_tasks().is_empty());
}

#[test]
fn overdue_queries_follow_the_clock_and_completion() {
    let (context, clock, _) = setup();
    let walk = template("Walk", None);
    context.create().save_task_available(walk.clone());

    let add = context.add_to_today();
    let due_today = add.add_task_to_today(&walk, None, Some(today()));
    let two_days = add.add_task_to_today(&walk, None, Some(days_ago(2)));
    let ten_days = add.add_task_to_today(&walk, None, Some(days_ago(10)));
    let done = add.add_task_to_today(&walk, None, Some(days_ago(1)));
    add.add_task_to_today(&walk, None, None);
    assert!(context.mark_complete().update_task_completion_status(done.id(), true));

    let overdue = context.overdue();
    let windowed: Vec<_> = overdue.get_overdue_tasks(7).iter().map(|i| i.id()).collect();
    assert_eq!(windowed, vec![two_days.id()]);
    let all: Vec<_> = overdue.get_all_overdue_tasks().iter().map(|i| i.id()).collect();
    assert_eq!(all, vec![ten_days.id(), two_days.id()]);

    clock.set_today(today().succ_opt().unwrap());
    let ids: HashSet<_> = overdue.get_all_overdue_tasks().iter().map(|i| i.id()).collect();
    assert!(ids.contains(&due_today.id()));
    assert!(!ids.contains(&done.id()));

    assert!(context.mark_complete().update_task_completion_status(done.id(), false));
    let ids: HashSet<_> = overdue.get_all_overdue_tasks().iter().map(|i| i.id()).collect();
    assert!(ids.contains(&done.id()));
}

#[test]
fn same_template_can_be_added_with_different_schedules_but_not_twice() {
    let (context, _, _) = setup();
    let gym = template("Gym", None);
    context.create().save_task_available(gym.clone());
    let add = context.add_to_today();

    let tomorrow = today().succ_opt();
    assert!(!add.is_exact_duplicate_in_todays_list(gym.id(), Some(Priority::High), tomorrow));
    add.add_task_to_today(&gym, Some(Priority::High), tomorrow);
    assert!(add.is_exact_duplicate_in_todays_list(gym.id(), Some(Priority::High), tomorrow));
    assert!(!add.is_exact_duplicate_in_todays_list(gym.id(), Some(Priority::Low), tomorrow));

    add.add_task_to_today(&gym, Some(Priority::Low), tomorrow);
    assert_eq!(context.delete().get_todays_tasks_by_template(gym.id()).len(), 2);
}

#[test]
fn removing_an_instance_keeps_template_and_siblings() {
    let (context, _, _) = setup();
    let gym = template("Gym", None);
    context.create().save_task_available(gym.clone());
    let add = context.add_to_today();
    let first = add.add_task_to_today(&gym, None, None);
    let second = add.add_task_to_today(&gym, Some(Priority::Medium), None);

    assert!(context.remove_from_today().remove_from_todays_list(first.id()));
    assert!(!context.remove_from_today().remove_from_todays_list(first.id()));

    let delete = context.delete();
    assert!(!delete.exists_in_today(&first));
    assert!(delete.exists_in_today(&second));
    assert!(context.create().exists(gym.id()));
}
