//! Weekly statistics commands.

use crate::app::App;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Fetch this week's completion statistics
    Weekly {
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let app = App::bootstrap()?;
    app.require_api()?;

    match action {
        StatsAction::Weekly { json } => {
            app.engine.refresh_stats().await;
            let store = app.store.lock().unwrap();
            match &store.weekly_stats {
                Some(stats) if json => println!("{}", serde_json::to_string_pretty(stats)?),
                Some(stats) => {
                    println!("week:        {} .. {}", stats.week_start, stats.week_end);
                    println!("created:     {}", stats.total_created);
                    println!("completed:   {}", stats.total_completed);
                    if let Some(rate) = stats.completion_rate {
                        println!("completion:  {rate:.1}%");
                    }
                    if let Some(days) = stats.avg_lifetime_days {
                        println!("avg life:    {days:.1} days");
                    }
                    if let Some(rate) = stats.adoption_rate {
                        println!("adoption:    {rate:.1}%");
                    }
                    if !stats.updated_at.is_empty() {
                        println!("updated:     {}", stats.updated_at);
                    }
                }
                None => println!("No weekly stats available."),
            }
        }
    }
    Ok(())
}
