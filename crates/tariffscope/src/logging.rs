use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log file name inside the data directory
pub const LOG_FILE: &str = "tariffscope.log";

const ROTATION_MARKER: &[u8] = b"--- Log rotated (older entries removed) ---\n";

/// Size limits for the log file, checked once at startup
#[derive(Debug, Clone, Copy)]
struct Rotation {
    /// Files larger than this get cut down
    limit: u64,
    /// Bytes of recent history kept after a cut
    tail: u64,
}

impl Rotation {
    const STARTUP: Rotation = Rotation {
        limit: 5 * 1024 * 1024,
        tail: 1024 * 1024,
    };

    /// Cuts `path` down to its last `tail` bytes once it grows past `limit`.
    /// The kept part starts on a line boundary.
    fn apply(self, path: &Path) -> io::Result<()> {
        let len = match fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e),
        };
        if len <= self.limit {
            return Ok(());
        }

        let tail = read_tail(path, len.saturating_sub(self.tail))?;
        let first_full_line = tail
            .iter()
            .position(|&b| b == b'\n')
            .map_or(0, |i| i + 1);

        let mut out = File::create(path)?;
        out.write_all(ROTATION_MARKER)?;
        out.write_all(&tail[first_full_line..])
    }
}

fn read_tail(path: &Path, from: u64) -> io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::Start(from))?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)?;
    Ok(buf)
}

/// Sends tracing output to `{data_dir}/tariffscope.log`.
///
/// Nothing goes to stderr while the dashboard owns the terminal. An oversized
/// log is cut to its most recent megabyte first. `RUST_LOG` takes precedence
/// over `level`, which applies to the app crate only.
pub fn init_logging(data_dir: &Path, level: &str) -> color_eyre::Result<()> {
    fs::create_dir_all(data_dir)?;
    let log_path = data_dir.join(LOG_FILE);

    if let Err(e) = Rotation::STARTUP.apply(&log_path) {
        eprintln!("Warning: could not shorten {}: {e}", log_path.display());
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("tariffscope={level},tariffscope_core=warn"))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()?;

    tracing::info!(log_path = %log_path.display(), "logging to file");
    Ok(())
}
