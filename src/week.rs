//! Week grid derivation.
//!
//! Everything here is a pure function of the task list; nothing is cached
//! between draws.

use crate::fields::{Day, Hour};
use crate::task::Task;

/// Tasks in one grid cell, in list order.
pub fn slot_tasks(tasks: &[Task], day: Day, hour: Hour) -> Vec<&Task> {
    tasks.iter().filter(|t| t.in_slot(day, hour)).collect()
}

/// Tasks ordered the way the grid reads: by day, then hour, then list order.
pub fn week_order(tasks: &[Task]) -> Vec<&Task> {
    let mut ordered: Vec<&Task> = tasks.iter().collect();
    // Stable sort keeps list order within a slot.
    ordered.sort_by_key(|t| (t.day, t.time));
    ordered
}

/// Label for a cell: the first title plus a count of the tasks stacked on it.
pub fn cell_label(slot: &[&Task]) -> String {
    match slot {
        [] => String::new(),
        [only] => only.title.clone(),
        [first, rest @ ..] => format!("{} +{}", first.title, rest.len()),
    }
}

/// Render the week as a fixed-width text table.
///
/// With `compact`, hours with no tasks on any day are skipped.
pub fn week_table(tasks: &[Task], compact: bool, col_width: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<6}", "Hour"));
    for day in Day::ALL {
        out.push_str(&format!(" {:<w$}", truncate(day.label(), col_width), w = col_width));
    }
    out.push('\n');

    for hour in Hour::all() {
        let cells: Vec<String> = Day::ALL
            .iter()
            .map(|&day| cell_label(&slot_tasks(tasks, day, hour)))
            .collect();
        if compact && cells.iter().all(String::is_empty) {
            continue;
        }
        out.push_str(&format!("{:<6}", hour.label()));
        for cell in &cells {
            let shown = if cell.is_empty() { "-".to_string() } else { truncate(cell, col_width) };
            out.push_str(&format!(" {:<w$}", shown, w = col_width));
        }
        out.push('\n');
    }
    out
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskId;

    fn task(id: u64, title: &str, day: Day, hour: u8) -> Task {
        Task {
            id: TaskId(id),
            title: title.to_string(),
            description: String::new(),
            day,
            time: Hour::new(hour).unwrap(),
        }
    }

    #[test]
    fn test_every_task_lands_in_exactly_one_cell() {
        let tasks = vec![
            task(1, "Gym", Day::Monday, 7),
            task(2, "Standup", Day::Monday, 9),
            task(3, "Review", Day::Friday, 9),
            task(4, "Call", Day::Monday, 9),
            task(5, "Late", Day::Sunday, 23),
        ];
        let mut seen = std::collections::HashMap::new();
        for day in Day::ALL {
            for hour in Hour::all() {
                let slot = slot_tasks(&tasks, day, hour);
                assert!(slot.iter().all(|t| t.day == day && t.time == hour));
                for t in slot {
                    *seen.entry(t.id).or_insert(0) += 1;
                }
            }
        }
        assert_eq!(seen.len(), tasks.len());
        assert!(seen.values().all(|&n| n == 1));
    }

    #[test]
    fn test_stacked_slot_keeps_list_order() {
        let tasks = vec![
            task(1, "Standup", Day::Monday, 9),
            task(2, "Other", Day::Tuesday, 9),
            task(3, "Call", Day::Monday, 9),
        ];
        let slot = slot_tasks(&tasks, Day::Monday, Hour::new(9).unwrap());
        let titles: Vec<&str> = slot.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Standup", "Call"]);
        assert_eq!(cell_label(&slot), "Standup +1");
    }

    #[test]
    fn test_week_order_sorts_by_day_then_hour() {
        let tasks = vec![
            task(1, "c", Day::Friday, 8),
            task(2, "a", Day::Monday, 10),
            task(3, "b", Day::Monday, 9),
            task(4, "d", Day::Monday, 9),
        ];
        let ids: Vec<u64> = week_order(&tasks).iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![3, 4, 2, 1]);
    }

    #[test]
    fn test_compact_table_skips_empty_hours() {
        let tasks = vec![task(1, "Study", Day::Tuesday, 9)];
        let full = week_table(&tasks, false, 10);
        assert_eq!(full.lines().count(), 25);

        let compact = week_table(&tasks, true, 10);
        let lines: Vec<&str> = compact.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Hour"));
        assert!(lines[1].starts_with("09:00"));
        assert!(lines[1].contains("Study"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Wednesday", 4), "Wed…");
        assert_eq!(truncate("Mon", 4), "Mon");
    }
}
