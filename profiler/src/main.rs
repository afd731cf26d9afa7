mod options;

use anyhow::Error as AnyError;
use clap::Parser;
use elevation::{Backend, BackendConfig};
use log::info;
use options::{Cli, Command as CliCmd, LatLon};
use serde::Serialize;
use std::{io::Write, time::Duration};
use textplots::{Chart, Plot, Shape};
use transect::{CancellationToken, Profile, ProfileError};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AnyError> {
    let Cli {
        points,
        step,
        chunk_size,
        tail,
        timeout,
        backend,
        endpoint,
        api_key,
        token,
        cmd,
    } = Cli::parse();

    env_logger::init();

    let backend = Backend::new(BackendConfig {
        kind: backend.into(),
        endpoint,
        api_key,
        token,
    })?;

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    let profile = match Profile::builder()
        .path(points.into_iter().map(|LatLon(coord)| coord))
        .step_size(step)
        .chunk_size(chunk_size)
        .tail(tail.into())
        .timeout((timeout > 0).then(|| Duration::from_secs(timeout)))
        .build(&backend, &cancel)
        .await
    {
        Ok(profile) => profile,
        Err(ProfileError::Cancelled) => {
            info!("cancelled");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    match cmd {
        CliCmd::Csv => print_csv(&profile)?,
        CliCmd::Json => print_json(&profile)?,
        CliCmd::Plot => plot_ascii(&profile),
        CliCmd::Stats => print_stats(&profile)?,
    };
    Ok(())
}

/// # Example with gnuplot
///
/// ```sh
/// cargo run -p profiler -- --point=-27.4698,153.0251 --point=-27.4750,153.0300 csv | tr ',' ' ' > /tmp/plot && gnuplot -p -e "plot '/tmp/plot' using 1:4 with lines"
/// ```
fn print_csv(profile: &Profile) -> Result<(), AnyError> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "Distance,Longitude,Latitude,Elevation,Grade")?;
    for (idx, ((distance, point), elevation)) in profile
        .distances_m
        .iter()
        .zip(profile.points.iter())
        .zip(profile.elevations_m.iter())
        .enumerate()
    {
        let longitude = point.x();
        let latitude = point.y();
        let grade = profile
            .grade_pct(idx)
            .map(|g| format!("{g:.2}"))
            .unwrap_or_default();
        writeln!(
            stdout,
            "{distance},{longitude},{latitude},{elevation},{grade}"
        )?;
    }
    Ok(())
}

fn print_json(profile: &Profile) -> Result<(), AnyError> {
    #[derive(Serialize)]
    struct JsonEntry {
        distance: f64,
        location: [f64; 2],
        elevation: f64,
    }

    let reshaped: Vec<JsonEntry> = profile
        .distances_m
        .iter()
        .zip(profile.points.iter())
        .zip(profile.elevations_m.iter())
        .map(|((distance, point), elevation)| JsonEntry {
            distance: *distance,
            location: [point.x(), point.y()],
            elevation: *elevation,
        })
        .collect();
    let json = serde_json::to_string(&reshaped)?;
    println!("{json}");
    Ok(())
}

fn plot_ascii(profile: &Profile) {
    #[allow(clippy::cast_possible_truncation)]
    let plot_data: Vec<(f32, f32)> = profile
        .distances_m
        .iter()
        .zip(profile.elevations_m.iter())
        .map(|(distance, elevation)| (*distance as f32, *elevation as f32))
        .collect();
    let x_max = plot_data.last().map_or(1.0, |(d, _)| d.max(1.0));
    Chart::new(300, 150, 0.0, x_max)
        .lineplot(&Shape::Lines(&plot_data))
        .display();
}

fn print_stats(profile: &Profile) -> Result<(), AnyError> {
    let Some(stats) = profile.stats() else {
        return Ok(());
    };
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "samples:         {}", profile.len())?;
    writeln!(stdout, "total distance:  {:.1} m", stats.total_distance_m)?;
    writeln!(
        stdout,
        "elevation range: {:.1} m - {:.1} m",
        stats.min_elevation_m, stats.max_elevation_m
    )?;
    writeln!(stdout, "total change:    {:.1} m", stats.elevation_range_m)?;
    writeln!(stdout, "average grade:   {:.1}%", stats.average_grade_pct)?;
    Ok(())
}
