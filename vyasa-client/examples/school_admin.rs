// vyasa-client/examples/school_admin.rs
// Log in by OTP (or resume a saved session) and print a school overview

use std::io::{self, BufRead, Write};

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use vyasa_client::api::StudentFilter;
use vyasa_client::{ClientConfig, Role, VyasaClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vyasa_client=info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 && std::env::var("VYASA_SESSION_FILE").is_err() {
        println!("Usage: {} <country_code> <mobile_no>", args[0]);
        println!("  Example: {} +91 9876543210", args[0]);
        println!("  Set VYASA_SESSION_FILE to reuse a saved session");
        return Ok(());
    }

    let config = ClientConfig::from_env().context("reading VYASA_* settings")?;
    tracing::info!(base_url = %config.api_base(), "Connecting");
    let client = VyasaClient::builder()
        .config(config)
        .on_session_expired(|to: &str| tracing::warn!("Session expired, go to {to}"))
        .build()?;

    let client = match client.resume() {
        Some(client) => {
            tracing::info!("Resumed saved session");
            client
        }
        None => {
            let (country_code, mobile_no) = match (args.get(1), args.get(2)) {
                (Some(cc), Some(mobile)) => (cc.as_str(), mobile.as_str()),
                _ => anyhow::bail!("no saved session; pass <country_code> <mobile_no>"),
            };
            let pending = client.request_otp(country_code, mobile_no).await?;
            let otp = prompt("OTP: ")?;
            pending.verify_otp(&otp).await?
        }
    };

    let me = client.me().await?;
    println!(
        "Logged in as {} ({})",
        me.name.as_deref().unwrap_or(&me.id),
        client.role().as_str()
    );

    if client.role() == Role::SuperAdmin {
        for school in client.schools().list().await? {
            let counts = school.counts.unwrap_or_default();
            println!(
                "{:<8} {:<30} active={} students={}",
                school.school_code, school.name, school.is_active, counts.students
            );
        }
        return Ok(());
    }

    let classes = client.classes().list().await?;
    let students = client.students().list(&StudentFilter::default()).await?;
    let holidays = client.holidays().list().await?;
    println!(
        "School {}: {} classes, {} students, {} holidays",
        client
            .school_id()
            .map(|s| s.to_string())
            .unwrap_or_default(),
        classes.len(),
        students.len(),
        holidays.len()
    );
    for class in &classes {
        let sections: Vec<&str> = class.sections.iter().map(|s| s.name.as_str()).collect();
        println!("  Class {:<6} sections: {}", class.name, sections.join(", "));
    }
    for announcement in client.announcements().list().await?.iter().take(5) {
        println!("  [{}] {}", announcement.created_at.date_naive(), announcement.title);
    }

    Ok(())
}

fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
