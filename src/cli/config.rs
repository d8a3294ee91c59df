use crate::error::{CadenceError, Result};
use crate::settings::{load_settings, save_settings, settings_path};

pub fn run(
    calendar_path: Option<String>,
    threshold: Option<f64>,
    forward_weekends: Option<bool>,
    html_target: Option<String>,
) -> Result<()> {
    let mut settings = load_settings();
    let mut changed = false;

    if let Some(path) = calendar_path {
        settings.calendar_path = path;
        changed = true;
    }
    if let Some(threshold) = threshold {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(CadenceError::Settings(format!(
                "threshold must be between 0 and 1, got {threshold}"
            )));
        }
        settings.recurrence_threshold = threshold;
        changed = true;
    }
    if let Some(forward) = forward_weekends {
        settings.forward_weekends = forward;
        changed = true;
    }
    if let Some(target) = html_target {
        settings.html_target = target;
        changed = true;
    }

    if changed {
        save_settings(&settings)?;
        println!("Saved {}", settings_path().display());
    }

    println!("Calendar:          {}", settings.calendar_path);
    println!("Threshold:         {}", settings.recurrence_threshold);
    println!("Forward weekends:  {}", settings.forward_weekends);
    println!("HTML target:       {}", settings.html_target);
    Ok(())
}
