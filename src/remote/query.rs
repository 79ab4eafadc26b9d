//! Remote status query construction
//!
//! The status text comes from a PowerShell pipeline on the target host.
//! Exclude mode dumps every task's info block in one call; include mode loops
//! over the watched names and probes each task's trigger list as it goes.

/// Full dump of every task's info block, no trigger probe
const ALL_TASKS_QUERY: &str =
    r#"powershell "Get-ScheduledTask | Get-ScheduledTaskInfo | Sort-Object""#;

/// Build the remote status command for the given watched task names
///
/// An empty slice selects the full dump. Otherwise a per-name loop emits the
/// six info fields and one trigger line per task: the first trigger's
/// `Enabled` state, or the literal `Enabled:False` when the task has no
/// triggers at all.
pub fn build_status_query(include_tasks: &[String]) -> String {
    if include_tasks.is_empty() {
        return ALL_TASKS_QUERY.to_string();
    }

    let names = include_tasks
        .iter()
        .map(|name| format!("'{}'", quote_single(name)))
        .collect::<Vec<_>>()
        .join(",");

    format!(
        r#"powershell "$task_array = ({names}); foreach ($i in $task_array) {{(Get-ScheduledTask -TaskName $i | Get-ScheduledTaskInfo) | select LastRunTime, LastTaskResult, NextRunTime, NumberOfMissedRuns, TaskName, TaskPath; $triggers = (Get-ScheduledTask -TaskName $i).Triggers; if ($triggers.count -gt 0) {{(Get-ScheduledTask -TaskName $i).Triggers[0] | select Enabled}} else {{echo Enabled:False}}}}""#
    )
}

/// PowerShell escapes a single quote inside a single-quoted string by doubling it
fn quote_single(name: &str) -> String {
    name.replace('\'', "''")
}
