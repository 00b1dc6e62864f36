//! Playwright integration for browser-backed rendering.
//!
//! Rendering runs in a `node -e` subprocess executing one of the inline
//! scripts below. Inputs travel as one JSON frame on the child's stdin
//! (argv cannot carry document-sized strings). The script reports a single
//! JSON object on stdout; errors are reported as JSON on stderr with a
//! non-zero exit. The browser is closed in a `finally` block on every path,
//! and the whole process is bounded by a kill-on-expiry timeout on the Rust
//! side.

use std::io;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tokio::time::timeout;

use crate::{HxeError, Result};

/// Profile-backed render script.
///
/// Opens a persistent context rooted at the given profile directory, or a
/// disposable browser when no directory is supplied. The enrichment script is
/// evaluated through a CDP session so it can use command-line-API-only
/// introspection primitives (e.g. `getEventListeners`) that are unavailable
/// to ordinary page scripts.
pub(crate) const PROFILE_SCRIPT: &str = r#"
let raw = '';
process.stdin.setEncoding('utf8');
process.stdin.on('data', (chunk) => { raw += chunk; });
process.stdin.on('end', () => {
  let input;
  try {
    input = JSON.parse(raw);
  } catch (err) {
    console.error(JSON.stringify({ status: 'error', message: 'invalid input frame: ' + err.message }));
    process.exit(1);
    return;
  }
  run(input);
});

async function run(input) {
  let browser;
  let context;
  try {
    const { chromium } = require('playwright');
    const headless = input.headless;
    if (input.profileDir) {
      context = await chromium.launchPersistentContext(input.profileDir, { headless });
    } else {
      browser = await chromium.launch({ headless });
      context = await browser.newContext();
    }
    const page = context.pages().length ? context.pages()[0] : await context.newPage();

    if (input.isUrl) {
      await page.goto(input.source, { waitUntil: 'networkidle', timeout: input.navTimeoutMs });
      await page.waitForLoadState('networkidle', { timeout: input.idleTimeoutMs });
    } else {
      await page.setContent(input.source);
    }

    const cdp = await context.newCDPSession(page);
    const evaluated = await cdp.send('Runtime.evaluate', {
      expression: input.injector,
      includeCommandLineAPI: true,
      returnByValue: true
    });
    if (evaluated.exceptionDetails) {
      const detail = evaluated.exceptionDetails.exception && evaluated.exceptionDetails.exception.description;
      throw new Error(detail || 'enrichment script threw inside the page');
    }
    const applied = Boolean(evaluated.result && evaluated.result.value);

    const html = await page.content();
    console.log(JSON.stringify({ status: 'ok', html, applied }));
  } catch (err) {
    const message = err && err.message ? err.message : String(err);
    console.error(JSON.stringify({ status: 'error', message }));
    process.exitCode = 1;
  } finally {
    if (context) {
      await context.close();
    }
    if (browser) {
      await browser.close();
    }
  }
}
"#;

/// Ephemeral render script.
///
/// Always launches a disposable browser. The enrichment script runs through
/// the page's standard evaluation entry point, then a second, independent
/// evaluation pulls the JSON payload the script deposited into the data
/// element. The payload text is returned verbatim; the Rust side decides how
/// to treat malformed JSON.
pub(crate) const EPHEMERAL_SCRIPT: &str = r#"
let raw = '';
process.stdin.setEncoding('utf8');
process.stdin.on('data', (chunk) => { raw += chunk; });
process.stdin.on('end', () => {
  let input;
  try {
    input = JSON.parse(raw);
  } catch (err) {
    console.error(JSON.stringify({ status: 'error', message: 'invalid input frame: ' + err.message }));
    process.exit(1);
    return;
  }
  run(input);
});

async function run(input) {
  let browser;
  try {
    const { chromium } = require('playwright');
    browser = await chromium.launch({ headless: input.headless });
    const page = await browser.newPage();

    if (input.isUrl) {
      await page.goto(input.source, { waitUntil: 'networkidle', timeout: input.navTimeoutMs });
      await page.waitForLoadState('networkidle', { timeout: input.idleTimeoutMs });
    } else {
      await page.setContent(input.source);
    }

    const applied = Boolean(await page.evaluate(input.injector));

    const data = await page.evaluate((id) => {
      const el = document.getElementById(id);
      return el && el.textContent ? el.textContent : '{}';
    }, input.dataId);

    const html = await page.content();
    console.log(JSON.stringify({ status: 'ok', html, applied, data }));
  } catch (err) {
    const message = err && err.message ? err.message : String(err);
    console.error(JSON.stringify({ status: 'error', message }));
    process.exitCode = 1;
  } finally {
    if (browser) {
      await browser.close();
    }
  }
}
"#;

/// Timeout for checking node/playwright availability.
pub(crate) const NODE_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Script to check if Playwright is installed.
const PLAYWRIGHT_CHECK_SCRIPT: &str = "require('playwright'); process.stdout.write('ok');";

/// Parsed stdout payload of a render script.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ScriptOutput {
    pub status: String,
    pub message: Option<String>,
    pub html: Option<String>,
    pub applied: Option<bool>,
    /// Raw extraction-data text (ephemeral script only).
    pub data: Option<String>,
}

/// Error result from a render script.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ScriptError {
    pub status: String,
    pub message: String,
}

/// Maps a spawn error to an appropriate HxeError.
pub(crate) fn map_spawn_error(err: io::Error, command: &str) -> HxeError {
    if err.kind() == io::ErrorKind::NotFound {
        HxeError::Render(format!(
            "Unable to spawn Playwright helper; '{}' was not found on PATH",
            command
        ))
    } else {
        HxeError::Io(err)
    }
}

/// Maps render-script stderr output to an appropriate HxeError.
pub(crate) fn map_playwright_error(status_text: impl Into<String>, stderr: &str) -> HxeError {
    if let Ok(error) = serde_json::from_str::<ScriptError>(stderr) {
        return map_playwright_status_error(&error.status, error.message);
    }

    let lower = stderr.to_ascii_lowercase();

    if lower.contains("cannot find module 'playwright'") {
        return HxeError::Render(
            "Playwright npm package is missing; install with `npm install playwright`.".to_string(),
        );
    }

    if lower.contains("timeout") {
        return HxeError::Render(
            "Playwright timed out; try increasing --nav-timeout/--network-idle-timeout or --process-timeout, and ensure the page finishes loading."
                .to_string(),
        );
    }

    HxeError::Render(format!(
        "Playwright exited with status {}: {}",
        status_text.into(),
        stderr.trim()
    ))
}

/// Maps a render-script status error to an appropriate HxeError.
pub(crate) fn map_playwright_status_error(status: &str, message: String) -> HxeError {
    let lower = message.to_ascii_lowercase();
    if lower.contains("cannot find module 'playwright'") {
        HxeError::Render(
            "Playwright npm package is missing; install with `npm install playwright`.".to_string(),
        )
    } else if lower.contains("timeout") {
        HxeError::Render(format!(
            "Playwright error (status {}): {}. Hint: increase --nav-timeout/--network-idle-timeout or --process-timeout, and ensure the page finishes loading.",
            status, message
        ))
    } else {
        HxeError::Render(format!("Playwright error (status {}): {}", status, message))
    }
}

/// Ensures Node.js is available on the system.
pub(crate) async fn ensure_node_available(node_command: &str) -> Result<()> {
    let mut cmd = Command::new(node_command);
    cmd.arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    let status = timeout(NODE_CHECK_TIMEOUT, cmd.status())
        .await
        .map_err(|_| {
            HxeError::Render(format!(
                "Timed out checking node availability after {:?}",
                NODE_CHECK_TIMEOUT
            ))
        })?
        .map_err(|err| map_spawn_error(err, node_command))?;

    if !status.success() {
        return Err(HxeError::Render(format!(
            "Node command {:?} is not available (exit {})",
            node_command, status
        )));
    }

    Ok(())
}

/// Ensures the Playwright npm package is installed.
pub(crate) async fn ensure_playwright_available(node_command: &str) -> Result<()> {
    let mut cmd = Command::new(node_command);
    cmd.arg("-e")
        .arg(PLAYWRIGHT_CHECK_SCRIPT)
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    let output = timeout(NODE_CHECK_TIMEOUT, cmd.output())
        .await
        .map_err(|_| {
            HxeError::Render(format!(
                "Timed out checking Playwright availability after {:?}",
                NODE_CHECK_TIMEOUT
            ))
        })?
        .map_err(|err| map_spawn_error(err, node_command))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(map_playwright_error(
            format!("{:?}", output.status),
            &stderr,
        ));
    }

    Ok(())
}

/// Runs an inline render script to completion and parses its stdout payload.
///
/// The input frame is serialized to JSON and written to the child's stdin.
/// The child is killed if it outlives `process_timeout`; success requires
/// both a zero exit status and an `ok` status in the JSON payload.
pub(crate) async fn run_script(
    node_command: &str,
    script: &str,
    input: &serde_json::Value,
    process_timeout: Duration,
) -> Result<ScriptOutput> {
    let frame = serde_json::to_string(input)?;

    let mut cmd = Command::new(node_command);
    cmd.arg("-e").arg(script);
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd
        .spawn()
        .map_err(|err| map_spawn_error(err, node_command))?;

    let stdin_pipe = child.stdin.take();
    let stdout_pipe = child.stdout.take();
    let stderr_pipe = child.stderr.take();

    let stdin_task = tokio::spawn(async move {
        if let Some(mut sink) = stdin_pipe {
            // The child may exit before draining the frame; its exit status
            // and stderr carry the real failure.
            let _ = sink.write_all(frame.as_bytes()).await;
            let _ = sink.shutdown().await;
        }
    });

    let stdout_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(mut out) = stdout_pipe {
            let _ = out.read_to_end(&mut buf).await;
        }
        buf
    });

    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(mut err) = stderr_pipe {
            let _ = err.read_to_end(&mut buf).await;
        }
        buf
    });

    let status = match timeout(process_timeout, child.wait()).await {
        Ok(Ok(status)) => status,
        Ok(Err(err)) => return Err(HxeError::Io(err)),
        Err(_) => {
            let _ = child.kill().await;
            let _ = child.wait().await;
            return Err(HxeError::Render(format!(
                "Playwright timed out after {:?}",
                process_timeout
            )));
        }
    };

    let _ = stdin_task.await;
    let stdout = stdout_task.await.unwrap_or_else(|_| Vec::new());
    let stderr = stderr_task.await.unwrap_or_else(|_| Vec::new());

    if !status.success() {
        let stderr = String::from_utf8_lossy(&stderr);
        return Err(map_playwright_error(status.to_string(), &stderr));
    }

    let stdout = String::from_utf8_lossy(&stdout);
    let payload: ScriptOutput = serde_json::from_str(&stdout).map_err(|e| {
        HxeError::Render(format!(
            "Unexpected Playwright output: {} - raw: {}",
            e,
            stdout.trim()
        ))
    })?;

    if payload.status != "ok" {
        let detail = payload
            .message
            .as_deref()
            .unwrap_or("no additional details");
        return Err(HxeError::Render(format!(
            "Playwright returned non-ok status {}: {}",
            payload.status, detail
        )));
    }

    Ok(payload)
}
