use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    load_settings, ControllerEvent, GestureController, HttpRecognitionService, MediaTarget,
    SimulatedVideo,
};
use shared::domain::Mode;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::error::RecvError,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod input;

use input::{parse_line, Input, HELP};

const DEFAULT_VIDEOS: [&str; 3] = ["intro.mp4=120", "tutorial.mp4=300", "demo.mp4=90"];

#[derive(Parser, Debug)]
#[command(about = "Drive simulated video players from a gesture/voice recognition service")]
struct Args {
    /// Recognition service base url; overrides the settings file.
    #[arg(long)]
    service_url: Option<String>,
    /// Settings file (defaults to ./gesture.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Video to control, as LABEL or LABEL=SECONDS. Repeatable.
    #[arg(long = "video", value_name = "LABEL[=SECONDS]")]
    videos: Vec<String>,
    /// Mode to push to the service on startup.
    #[arg(long)]
    mode: Option<Mode>,
    /// Start recognition immediately.
    #[arg(long)]
    autostart: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref());
    if let Some(url) = args.service_url {
        settings.service_url = url;
    }

    let specs: Vec<&str> = if args.videos.is_empty() {
        DEFAULT_VIDEOS.to_vec()
    } else {
        args.videos.iter().map(String::as_str).collect()
    };
    let targets = specs
        .into_iter()
        .map(parse_video)
        .collect::<Result<Vec<_>>>()?;

    let service = HttpRecognitionService::new(&settings.service_url, settings.request_timeout)
        .with_context(|| format!("invalid service url: {}", settings.service_url))?;
    let controller = GestureController::new(Arc::new(service), targets, &settings);

    let mut events = controller.subscribe_events();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => println!("{}", render_event(&event)),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "ui event backlog dropped"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    if let Err(err) = controller.refresh_status().await {
        warn!(%err, "recognition service status unavailable");
    }
    if let Some(mode) = args.mode {
        let _ = controller.set_mode(mode).await;
    }
    if args.autostart {
        let _ = controller.start().await;
    }

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let input = match parse_line(&line) {
            Ok(input) => input,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match input {
            Input::Start => {
                let _ = controller.start().await;
            }
            Input::Stop => {
                let _ = controller.stop().await;
            }
            Input::Mode(mode) => {
                let _ = controller.set_mode(mode).await;
            }
            Input::Select(index) => {
                if !controller.select_target(index).await {
                    println!("no video #{}", index + 1);
                }
            }
            Input::Key(key) => {
                if controller.handle_key(key).await.is_none() && !controller.is_active().await {
                    println!("shortcuts are only active while gesture control is running");
                }
            }
            Input::Command(command) => {
                controller.execute(&command).await;
            }
            Input::Status => match controller.refresh_status().await {
                Ok(status) => println!(
                    "service running={} mode={} | local active={} polling={}",
                    status.running,
                    status.mode,
                    controller.is_active().await,
                    controller.is_polling().await
                ),
                Err(err) => println!("status unavailable: {err}"),
            },
            Input::List => {
                let active = controller.active_index().await;
                for (index, target) in controller.targets().await.iter().enumerate() {
                    println!("{}", describe_target(index, target.as_ref(), active == Some(index)));
                }
            }
            Input::Help => println!("{HELP}"),
            Input::Quit => break,
        }
    }

    if controller.is_active().await {
        let _ = controller.stop().await;
    }
    Ok(())
}

fn parse_video(spec: &str) -> Result<Arc<dyn MediaTarget>> {
    let (label, duration) = match spec.split_once('=') {
        Some((label, seconds)) => {
            let seconds: f64 = seconds
                .trim()
                .parse()
                .with_context(|| format!("invalid duration in video spec '{spec}'"))?;
            (label.trim(), seconds)
        }
        None => (spec.trim(), 60.0),
    };
    anyhow::ensure!(!label.is_empty(), "video spec '{spec}' has no label");
    Ok(Arc::new(SimulatedVideo::new(label, duration)))
}

fn render_event(event: &ControllerEvent) -> String {
    match event {
        ControllerEvent::Feedback { target, text, .. } => format!("[{target}] {text}"),
        ControllerEvent::Notification {
            message,
            is_error: true,
            ..
        } => format!("!! {message}"),
        ControllerEvent::Notification { message, .. } => format!("-- {message}"),
        ControllerEvent::SessionStateChanged { active } => {
            ControllerEvent::status_indicator_text(*active).to_string()
        }
        ControllerEvent::ModeChanged(mode) => {
            let marks: Vec<String> = Mode::ALL
                .iter()
                .map(|candidate| {
                    if candidate == mode {
                        format!("[{candidate}]")
                    } else {
                        candidate.to_string()
                    }
                })
                .collect();
            format!("mode: {}", marks.join(" "))
        }
        ControllerEvent::TargetSelected { index, label } => {
            format!("active video: #{} {label}", index + 1)
        }
    }
}

fn describe_target(index: usize, target: &dyn MediaTarget, active: bool) -> String {
    format!(
        "{} #{} {} | {} | volume {:.0}% | {:.1}s{}",
        if active { '*' } else { ' ' },
        index + 1,
        target.label(),
        if target.is_paused() { "paused" } else { "playing" },
        target.volume() * 100.0,
        target.position(),
        if target.is_fullscreen() { " | fullscreen" } else { "" },
    )
}
