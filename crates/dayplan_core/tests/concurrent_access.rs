use chrono::NaiveDate;
use dayplan_core::{
    AddToTodayRepository, CreateTaskRepository, DeleteTaskRepository, FixedClock,
    InMemoryGoalDirectory, TaskBook, TaskCategoryRepository, TaskContext, TaskInfo, TaskTemplate,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

const TEMPLATES: usize = 200;

fn context() -> TaskContext {
    TaskContext::new(
        TaskBook::new(),
        Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap())),
        Arc::new(InMemoryGoalDirectory::default()),
    )
}

#[test]
fn readers_never_observe_a_half_finished_cascade_delete() {
    let context = context();
    let mut ids = Vec::new();
    for index in 0..TEMPLATES {
        let template = TaskTemplate::new(
            TaskInfo::new(format!("Task {index}"), "", Some("batch")).unwrap(),
            None,
            false,
        );
        context.create().save_task_available(template.clone());
        context.add_to_today().add_task_to_today(&template, None, None);
        context.add_to_today().add_task_to_today(&template, None, None);
        ids.push(template.id());
    }

    let done = Arc::new(AtomicBool::new(false));
    let reader = {
        let book = context.book().clone();
        let done = done.clone();
        thread::spawn(move || {
            let mut checks = 0usize;
            while !done.load(Ordering::Acquire) || checks == 0 {
                let (templates, instances) = book.records();
                let live: HashSet<_> = templates.iter().map(|t| t.id()).collect();
                for instance in &instances {
                    assert!(
                        live.contains(&instance.template_task_id()),
                        "instance outlived its template mid-cascade"
                    );
                }
                assert_eq!(instances.len(), templates.len() * 2);
                checks += 1;
            }
            checks
        })
    };

    let delete = context.delete();
    for id in ids {
        assert!(delete.delete_task_completely(id));
    }
    done.store(true, Ordering::Release);

    assert!(reader.join().unwrap() > 0);
    assert_eq!(context.book().template_count(), 0);
    assert_eq!(context.book().instance_count(), 0);
}

#[test]
fn readers_see_category_cascade_all_or_nothing() {
    let context = context();
    for index in 0..TEMPLATES {
        let template = TaskTemplate::new(
            TaskInfo::new(format!("Chore {index}"), "", Some("home")).unwrap(),
            None,
            false,
        );
        context.create().save_task_available(template.clone());
        context.add_to_today().add_task_to_today(&template, None, None);
    }

    let book = context.book().clone();
    let reader = thread::spawn(move || {
        for _ in 0..50 {
            let (templates, instances) = book.records();
            let categorized = templates
                .iter()
                .map(|t| t.info().category())
                .chain(instances.iter().map(|i| i.info().category()))
                .filter(|category| *category == "home")
                .count();
            assert!(categorized == 0 || categorized == TEMPLATES * 2);
        }
    });

    let report = context.categories().clear_category_references("home");
    reader.join().unwrap();

    assert_eq!(report.total(), TEMPLATES * 2);
}
