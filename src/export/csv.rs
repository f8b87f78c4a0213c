//! CSV output of finished runs
//!
//! Trajectory: `time,energy,x0,v0,x1,v1,...`, one row per sample.
//! Spectrum:   `frequency,body0,body1,...`, one row per rfft bin.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::analysis::spectrum::{rfft_freq, rfft_magnitude};
use crate::simulation::engine::Trajectory;

pub fn write_trajectory<W: Write>(writer: W, tr: &Trajectory) -> csv::Result<()> {
    let mut w = csv::Writer::from_writer(writer);

    let mut header = vec!["time".to_string(), "energy".to_string()];
    for i in 0..tr.chain.len() {
        header.push(format!("x{i}"));
        header.push(format!("v{i}"));
    }
    w.write_record(&header)?;

    let mut row = Vec::with_capacity(header.len());
    for s in 0..tr.samples() {
        row.clear();
        row.push(tr.time[s].to_string());
        row.push(tr.energy[s].to_string());
        for b in &tr.chain.bodies {
            row.push(b.position_history[s].to_string());
            row.push(b.velocity_history[s].to_string());
        }
        w.write_record(&row)?;
    }
    w.flush()?;
    Ok(())
}

/// Magnitude spectrum of every body's position history
pub fn write_spectrum<W: Write>(writer: W, tr: &Trajectory) -> csv::Result<()> {
    let mut w = csv::Writer::from_writer(writer);

    let mut header = vec!["frequency".to_string()];
    header.extend((0..tr.chain.len()).map(|i| format!("body{i}")));
    w.write_record(&header)?;

    let freqs = rfft_freq(tr.samples(), tr.t_sample);
    let mags: Vec<Vec<f64>> = tr
        .chain
        .bodies
        .iter()
        .map(|b| rfft_magnitude(&b.position_history))
        .collect();

    for (k, f) in freqs.iter().enumerate() {
        let mut row = vec![f.to_string()];
        row.extend(mags.iter().map(|m| m[k].to_string()));
        w.write_record(&row)?;
    }
    w.flush()?;
    Ok(())
}

/// Write `<algorithm>_trajectory.csv` (and `<algorithm>_spectrum.csv` when
/// `spectrum` is set) into `dir`, returning the created paths
pub fn export_run(dir: &Path, tr: &Trajectory, spectrum: bool) -> csv::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    let path = dir.join(format!("{}_trajectory.csv", tr.algorithm));
    write_trajectory(File::create(&path)?, tr)?;
    written.push(path);

    if spectrum {
        let path = dir.join(format!("{}_spectrum.csv", tr.algorithm));
        write_spectrum(File::create(&path)?, tr)?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::config::Algorithm;
    use crate::simulation::engine::simulate;
    use crate::simulation::params::Parameters;
    use crate::simulation::states::BodySpec;

    fn run() -> Trajectory {
        let bodies = [
            BodySpec::new(1.0, 10.0, 5.0, 7.0, 0.0),
            BodySpec::new(1.0, 10.0, 5.0, 12.0, 0.0),
        ];
        simulate(&Parameters::new(0.3, 0.01, 0.1), &bodies, Algorithm::Verlet).unwrap()
    }

    #[test]
    fn trajectory_rows_and_columns() {
        let tr = run();
        let mut buf = Vec::new();
        write_trajectory(&mut buf, &tr).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "time,energy,x0,v0,x1,v1");
        assert_eq!(lines.len(), 1 + tr.samples());
        assert!(lines[1].starts_with("0,20,7,0,12,0"));
    }

    #[test]
    fn spectrum_has_one_row_per_bin() {
        let tr = run();
        let mut buf = Vec::new();
        write_spectrum(&mut buf, &tr).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "frequency,body0,body1");
        assert_eq!(lines.len(), 1 + tr.samples() / 2 + 1);
    }
}
