//! FitLife CLI
//!
//! Command-line client for a running FitLife API server:
//! - Register and sign in
//! - Generate workout and nutrition plans
//! - Log meals and export progress
//! - Talk to the coach
//! - Check status

use clap::{Parser, Subcommand, ValueEnum};
use fitlife::models::{ChatMessage, FitnessLevel, NutritionPlan, User, WorkoutPlan};
use reqwest::{RequestBuilder, Response};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fitlife")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "AI fitness and nutrition coach")]
#[command(long_about = "FitLife generates personalized workout and nutrition plans.\nSign in with `login`, then export FITLIFE_TOKEN to use the other commands.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8090", global = true)]
    pub api_url: String,

    /// Session token (default: $FITLIFE_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account
    Register {
        email: String,
        name: String,
    },

    /// Sign in and print the session token
    Login {
        email: String,
        name: String,
    },

    /// Workout plans
    Workout {
        #[command(subcommand)]
        action: WorkoutAction,
    },

    /// Nutrition plans
    Nutrition {
        #[command(subcommand)]
        action: NutritionAction,
    },

    /// Log a meal in today's food log
    Food {
        /// Food name
        name: String,
        /// Calories
        calories: i64,
    },

    /// Export progress metrics as CSV
    Export {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Send a message to the AI coach
    Chat {
        /// Message text
        message: Vec<String>,
    },

    /// Show server status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum WorkoutAction {
    /// Generate a new plan; omitted options use the profile
    Generate(WorkoutArgs),
    /// Show the current plan
    Show,
}

#[derive(Subcommand)]
pub enum NutritionAction {
    /// Generate a new plan; omitted options use the profile
    Generate(NutritionArgs),
    /// Show the current plan
    Show,
}

#[derive(clap::Args)]
pub struct WorkoutArgs {
    #[arg(short, long)]
    level: Option<Level>,
    /// Goals (repeatable)
    #[arg(short, long)]
    goal: Vec<String>,
    /// Minutes per session
    #[arg(short, long)]
    minutes: Option<u32>,
    #[arg(short, long)]
    days: Option<u8>,
    /// Available equipment (repeatable)
    #[arg(short, long)]
    equipment: Vec<String>,
}

#[derive(clap::Args)]
pub struct NutritionArgs {
    #[arg(short, long)]
    goal: Option<String>,
    /// Daily calorie target
    #[arg(short, long)]
    calories: Option<u32>,
    /// Dietary restrictions (repeatable)
    #[arg(short, long)]
    restriction: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl From<Level> for FitnessLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Beginner => FitnessLevel::Beginner,
            Level::Intermediate => FitnessLevel::Intermediate,
            Level::Advanced => FitnessLevel::Advanced,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let api = format!("{}/api/v1", cli.api_url);
    let json_output = cli.format == "json";
    let token = cli
        .token
        .clone()
        .or_else(|| std::env::var("FITLIFE_TOKEN").ok());

    match cli.command {
        Commands::Register { email, name } => {
            let body = serde_json::json!({ "email": email, "name": name });
            let response = send(client.post(format!("{}/auth/register", api)).json(&body)).await;
            print_session(response.json().await?, json_output);
        }

        Commands::Login { email, name } => {
            let body = serde_json::json!({ "email": email, "name": name });
            let response = send(client.post(format!("{}/auth/login", api)).json(&body)).await;
            print_session(response.json().await?, json_output);
        }

        Commands::Workout { action } => {
            let token = require_token(token);
            let url = format!("{}/dashboard/workouts", api);
            let plan: Option<WorkoutPlan> = match action {
                WorkoutAction::Generate(args) => {
                    let mut body = serde_json::json!({
                        "fitnessLevel": args.level.map(FitnessLevel::from),
                        "timePerSession": args.minutes,
                        "daysPerWeek": args.days,
                    });
                    if !args.goal.is_empty() {
                        body["goals"] = serde_json::json!(args.goal);
                    }
                    if !args.equipment.is_empty() {
                        body["availableEquipment"] = serde_json::json!(args.equipment);
                    }
                    eprintln!("Generating workout plan...");
                    let request = client.post(format!("{}/generate", url)).bearer_auth(&token);
                    Some(send(request.json(&body)).await.json().await?)
                }
                WorkoutAction::Show => {
                    let panel: serde_json::Value =
                        send(client.get(&url).bearer_auth(&token)).await.json().await?;
                    serde_json::from_value(panel["current"].clone()).ok()
                }
            };

            match plan {
                Some(plan) if json_output => println!("{}", serde_json::to_string_pretty(&plan)?),
                Some(plan) => print_workout(&plan),
                None => println!("No current workout plan. Run `fitlife workout generate`."),
            }
        }

        Commands::Nutrition { action } => {
            let token = require_token(token);
            let url = format!("{}/dashboard/nutrition", api);
            let plan: Option<NutritionPlan> = match action {
                NutritionAction::Generate(args) => {
                    let mut body = serde_json::json!({
                        "goal": args.goal,
                        "dailyCalories": args.calories,
                    });
                    if !args.restriction.is_empty() {
                        body["dietaryRestrictions"] = serde_json::json!(args.restriction);
                    }
                    eprintln!("Generating nutrition plan...");
                    let request = client.post(format!("{}/generate", url)).bearer_auth(&token);
                    Some(send(request.json(&body)).await.json().await?)
                }
                NutritionAction::Show => {
                    let panel: serde_json::Value =
                        send(client.get(&url).bearer_auth(&token)).await.json().await?;
                    serde_json::from_value(panel["current"].clone()).ok()
                }
            };

            match plan {
                Some(plan) if json_output => println!("{}", serde_json::to_string_pretty(&plan)?),
                Some(plan) => print_nutrition(&plan),
                None => println!("No current nutrition plan. Run `fitlife nutrition generate`."),
            }
        }

        Commands::Food { name, calories } => {
            let token = require_token(token);
            let body = serde_json::json!({ "name": name, "calories": calories });
            let url = format!("{}/dashboard/nutrition/food-log", api);
            let request = client.post(&url).bearer_auth(&token).json(&body);
            let entry: serde_json::Value = send(request).await.json().await?;

            if json_output {
                println!("{}", serde_json::to_string_pretty(&entry)?);
            } else {
                println!("Logged {} ({} kcal)", name, calories);
                let log: serde_json::Value =
                    send(client.get(&url).bearer_auth(&token)).await.json().await?;
                if let Some(total) = log["totalCalories"].as_u64() {
                    println!("Total today: {} kcal", total);
                }
            }
        }

        Commands::Export { output } => {
            let token = require_token(token);
            let request = client
                .get(format!("{}/dashboard/progress/export", api))
                .bearer_auth(&token);
            let csv = send(request).await.text().await?;

            match output {
                Some(path) => {
                    std::fs::write(&path, &csv)?;
                    println!("Exported to {:?}", path);
                }
                None => print!("{}", csv),
            }
        }

        Commands::Chat { message } => {
            let token = require_token(token);
            let text = message.join(" ");
            if text.trim().is_empty() {
                eprintln!("Nothing to send");
                std::process::exit(1);
            }

            let body = serde_json::json!({ "message": text });
            let request = client
                .post(format!("{}/chat/messages", api))
                .bearer_auth(&token)
                .json(&body);
            let reply: ChatMessage = send(request).await.json().await?;

            if json_output {
                println!("{}", serde_json::to_string_pretty(&reply)?);
            } else {
                println!("{}", reply.text);
            }
        }

        Commands::Status => {
            let response = client.get(format!("{}/health", cli.api_url)).send().await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: serde_json::Value = resp.json().await?;

                    if json_output {
                        println!("{}", serde_json::to_string_pretty(&health)?);
                        return Ok(());
                    }

                    println!("FitLife v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!(
                        "API Status: {}",
                        health["status"].as_str().unwrap_or("unknown")
                    );
                    println!("AI: {}", health["ai"].as_str().unwrap_or("unknown"));

                    println!();
                    println!("Storage:");
                    println!(
                        "  Backend: {} ({})",
                        health["backend"].as_str().unwrap_or("unknown"),
                        health["storage"].as_str().unwrap_or("unknown")
                    );
                    if let Some(bytes) = health["storage_bytes"].as_u64() {
                        println!("  Size: {} bytes", bytes);
                    }
                    if let Some(sessions) = health["sessions"].as_u64() {
                        println!("  Chat sessions: {}", sessions);
                    }

                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!();
                        println!("Uptime: {}", format_duration(uptime));
                    }
                }
                Ok(resp) => {
                    eprintln!("API returned error: {}", resp.status());
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Cannot connect to FitLife API at {}", cli.api_url);
                    eprintln!("Error: {}", e);
                    eprintln!();
                    eprintln!("Start the server with: fitlife");
                    std::process::exit(1);
                }
            }
        }

        Commands::Config { output } => {
            let config = fitlife::config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// Send a request, exiting with the server's error message on failure
async fn send(request: RequestBuilder) -> Response {
    let response = match request.send().await {
        Ok(resp) => resp,
        Err(e) => {
            eprintln!("Request failed: {}", e);
            std::process::exit(1);
        }
    };

    if response.status().is_success() {
        return response;
    }

    let status = response.status();
    let body: serde_json::Value = response.json().await.unwrap_or_default();
    let message = body["error"]["message"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string());
    eprintln!("Failed ({}): {}", status, message);
    std::process::exit(1);
}

fn require_token(token: Option<String>) -> String {
    match token {
        Some(token) if !token.trim().is_empty() => token,
        _ => {
            eprintln!("Not signed in. Run `fitlife login` and export FITLIFE_TOKEN.");
            std::process::exit(1);
        }
    }
}

fn print_session(session: serde_json::Value, json_output: bool) {
    if json_output {
        println!("{}", session);
        return;
    }

    let token = session["token"].as_str().unwrap_or_default();
    match serde_json::from_value::<User>(session["user"].clone()) {
        Ok(user) => println!("Signed in as {} <{}> ({} plan)", user.name, user.email, user.plan),
        Err(_) => println!("Signed in"),
    }
    println!();
    println!("export FITLIFE_TOKEN={}", token);
}

fn print_workout(plan: &WorkoutPlan) {
    println!("{} ({})", plan.name, plan.fitness_level);
    if let Some(description) = &plan.description {
        println!("{}", description);
    }

    for day in &plan.days {
        println!();
        match day.estimated_duration_minutes {
            Some(minutes) => println!("{} - {} (~{} min)", day.day, day.focus, minutes),
            None => println!("{} - {}", day.day, day.focus),
        }
        for exercise in &day.exercises {
            println!(
                "  {:<30} {:>6} x {:<12} rest {}",
                exercise.name, exercise.sets, exercise.reps, exercise.rest
            );
        }
    }
}

fn print_nutrition(plan: &NutritionPlan) {
    println!("{} ({} kcal/day)", plan.name, plan.daily_calorie_target);
    if let Some(description) = &plan.description {
        println!("{}", description);
    }

    for day in &plan.days {
        println!();
        match day.calories() {
            Some(total) => println!("{} ({:.0} kcal)", day.day, total),
            None => println!("{}", day.day),
        }
        for meal in day.meals.iter() {
            match meal.calories {
                Some(kcal) => println!("  {:<28} {:>6.0} kcal  {}", meal.name, kcal, meal.description),
                None => println!("  {:<28} {:>11}  {}", meal.name, "", meal.description),
            }
        }
    }
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}
