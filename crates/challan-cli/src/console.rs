use chrono::Local;

use challan_core::ViolationRecord;
use challan_generate::{RunSummary, ScheduleConfig, SchedulerState, TickReport};

pub fn record_line(record: &ViolationRecord) -> String {
    format!(
        "{} | {} | {} - {} | name={} | -₹{} | +₹{}",
        record.timestamp,
        record.vehicle_plate,
        record.violation_code,
        record.violation_text,
        record.offender_name,
        record.challan_amount,
        record.credits_amount
    )
}

pub fn print_batch(records: &[ViolationRecord]) {
    println!("\nGenerated {} fake violation records\n", records.len());
    for record in records {
        println!("{}", record_line(record));
    }
}

pub fn print_live_start(schedule: &ScheduleConfig) {
    println!(
        "Starting mock generator: {} min, every {}s, ~{} records / interval.",
        schedule.total.as_secs() / 60,
        schedule.interval.as_secs(),
        schedule.batch_size
    );
}

pub fn print_tick(report: &TickReport, photos_dir: &str) {
    let at = report.at.with_timezone(&Local).format("%Y-%m-%dT%H:%M:%S");
    println!(
        "[{}] {at} -> generated {} records; CSV appended, photos saved in '{photos_dir}'",
        report.index, report.count
    );
    if let Some(sample) = &report.sample {
        println!(
            "  sample: {} {} {} {}",
            sample.id,
            sample.vehicle_plate,
            sample.violation_code,
            sample.photo_reference.as_deref().unwrap_or("-")
        );
    }
}

pub fn print_live_end(summary: &RunSummary) {
    match summary.state {
        SchedulerState::Interrupted => {
            println!("Interrupted by user. Exiting and saving what we have.")
        }
        _ => println!("Run duration completed. Stopping."),
    }
    println!(
        "Done. CSV: {}   Photos dir: {}",
        summary.csv_path.display(),
        summary.photos_dir.display()
    );
}
