use chrono::Local;
use std::env;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

/// Read current process memory usage from /proc/self/status.
/// Returns (VmRSS in MB, VmSize in MB) or None if unable to read.
pub fn process_memory_mb() -> Option<(f64, f64)> {
    let file = fs::File::open("/proc/self/status").ok()?;
    let reader = BufReader::new(file);

    let mut vm_rss_kb = None;
    let mut vm_size_kb = None;

    for line in reader.lines().map_while(Result::ok) {
        if line.starts_with("VmRSS:") {
            // Format: "VmRSS:     12345 kB"
            if let Some(value_str) = line.split_whitespace().nth(1) {
                vm_rss_kb = value_str.parse::<f64>().ok();
            }
        } else if line.starts_with("VmSize:") {
            if let Some(value_str) = line.split_whitespace().nth(1) {
                vm_size_kb = value_str.parse::<f64>().ok();
            }
        }

        if vm_rss_kb.is_some() && vm_size_kb.is_some() {
            break;
        }
    }

    Some((vm_rss_kb? / 1024.0, vm_size_kb? / 1024.0))
}

pub fn data_dir() -> PathBuf {
    let xdg_data_home = env::var("XDG_DATA_HOME")
        .ok()
        .and_then(|path| {
            if path.is_empty() {
                None
            } else {
                Some(PathBuf::from(path))
            }
        })
        .or_else(|| {
            env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".local/share"))
        })
        .expect("Could not determine data directory");

    xdg_data_home.join("sievebench")
}

/// Write primes to primes.txt in the data dir, one per line, buffered and
/// formatted with itoa. Returns the path written.
pub fn save_primes(primes: &[usize]) -> std::io::Result<PathBuf> {
    let dir = data_dir();
    fs::create_dir_all(&dir)?;

    let path = dir.join("primes.txt");
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)?;

    let mut writer = BufWriter::with_capacity(256 * 1024, file);
    let mut itoa_buf = itoa::Buffer::new();
    for &prime in primes {
        writer.write_all(itoa_buf.format(prime).as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    Ok(path)
}

/// Append one timestamped line per invocation to execution_log.txt.
pub fn log_execution(subcommand: &str, args: &str, duration_us: u128) -> std::io::Result<()> {
    let dir = data_dir();
    fs::create_dir_all(&dir)?;

    let log_path = dir.join("execution_log.txt");
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");

    writeln!(
        file,
        "{} | {} | {} | {}us",
        timestamp, subcommand, args, duration_us
    )?;

    Ok(())
}
