//! Simulated keypad input.
//!
//! Lines read from stdin are turned into presses on the mock matrix, one
//! key at a time, each held long enough for the poll loop to see it and
//! released long enough for the debounce window to close.

use std::time::Duration;

use doorlock_core::KeyMap;
use doorlock_hardware::mock::MockMatrixHandle;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time;
use tracing::{debug, info};

/// Cells to press for each character of `line` that exists on the keypad.
///
/// Whitespace is skipped silently; other unknown characters are logged and
/// skipped.
pub fn cells_for_line(line: &str, key_map: &KeyMap) -> Vec<(usize, usize)> {
    line.chars()
        .filter(|c| !c.is_whitespace())
        .filter_map(|c| {
            let cell = key_map.position(c);
            if cell.is_none() {
                debug!(key = %c, "Not on the keypad, skipped");
            }
            cell
        })
        .collect()
}

/// Press and release `(row, col)`, holding each phase for `hold`.
pub async fn tap(
    handle: &MockMatrixHandle,
    (row, col): (usize, usize),
    hold: Duration,
) -> anyhow::Result<()> {
    handle.press(row, col)?;
    time::sleep(hold).await;
    handle.release(row, col)?;
    time::sleep(hold).await;
    Ok(())
}

/// Feed every line of `reader` to the matrix until end of input.
pub async fn feed_keys<R>(
    reader: R,
    handle: MockMatrixHandle,
    key_map: KeyMap,
    hold: Duration,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        for cell in cells_for_line(&line, &key_map) {
            tap(&handle, cell, hold).await?;
        }
    }

    info!("Keypad input closed");
    Ok(())
}
