mod common;
mod config;
mod network;
mod ui;

use std::time::Duration;

use clap::{Parser, ValueEnum};
use dotenvy::dotenv;
use tokio::sync::mpsc;

use common::SenderRole;
use network::{ApiClient, ChatSession, SessionConfig};
use ui::ChatApp;

#[derive(Parser)]
#[command(
    name = "clinic_chat",
    version,
    about = "Staff/doctor chat client for the clinic platform"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Staff participant id
    #[arg(long)]
    staff: String,
    /// Doctor participant id
    #[arg(long)]
    doctor: String,
    /// Which side of the conversation this client speaks for
    #[arg(long, value_enum, default_value = "staff")]
    role: Role,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Role {
    Staff,
    Doctor,
}

impl From<Role> for SenderRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Staff => SenderRole::Staff,
            Role::Doctor => SenderRole::Doctor,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), eframe::Error> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let app_config = config::load_config(&cli.config);

    // UI -> session
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    // Session -> UI
    let (event_tx, event_rx) = mpsc::channel(100);

    let api = ApiClient::new(app_config.api_base_url.clone());
    let session_config = SessionConfig {
        staff_id: cli.staff.clone(),
        doctor_id: cli.doctor.clone(),
        role: cli.role.into(),
        live_url: app_config.live_url.clone(),
        poll_interval: Duration::from_secs(app_config.poll_interval_secs.max(1)),
    };

    let session = ChatSession::new(api.clone(), session_config, event_tx, cmd_rx);
    tokio::spawn(session.run());

    let options = eframe::NativeOptions::default();
    let mut event_rx = Some(event_rx);
    let title = format!("Clinic Chat ({} / {})", cli.staff, cli.doctor);

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            let event_receiver = event_rx
                .take()
                .expect("ChatApp should only be initialized once");

            Ok(Box::new(ChatApp::new(
                cc,
                api.clone(),
                cmd_tx.clone(),
                event_receiver,
            )))
        }),
    )
}
