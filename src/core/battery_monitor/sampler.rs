//! Battery probe invocation.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use super::reading::BatteryReading;
use crate::core::config::ProbeConfig;
use crate::error::SampleError;

/// Raw result of one probe invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutput {
    pub success: bool,
    /// Exit code, `None` when the process was terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
}

impl ProbeOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
        }
    }
}

/// Platform facility queried for battery status
#[async_trait]
pub trait BatteryProbe: Send + Sync {
    /// Run the probe once. Errors mean the probe could not be run at all.
    async fn invoke(&self) -> Result<ProbeOutput, SampleError>;
}

/// Probe that runs an external command, bounded by a timeout
#[derive(Debug, Clone)]
pub struct CommandProbe {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandProbe {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    pub fn from_config(config: &ProbeConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone(), config.timeout())
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Full path of the probe binary, if it can be found
    pub fn resolve(&self) -> Option<PathBuf> {
        which::which(&self.program).ok()
    }
}

#[async_trait]
impl BatteryProbe for CommandProbe {
    async fn invoke(&self) -> Result<ProbeOutput, SampleError> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Err(_) => return Err(SampleError::Timeout(self.timeout)),
            Ok(Err(e)) => {
                return Err(SampleError::probe_unavailable(format!(
                    "failed to run '{}': {}",
                    self.program, e
                )))
            }
            Ok(Ok(output)) => output,
        };

        Ok(ProbeOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

/// Turns probe output into a [`BatteryReading`]
pub struct BatterySampler<P> {
    probe: P,
    charging_marker: String,
}

impl<P: BatteryProbe> BatterySampler<P> {
    pub fn new(probe: P, charging_marker: impl Into<String>) -> Self {
        Self {
            probe,
            charging_marker: charging_marker.into(),
        }
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    pub async fn sample(&self) -> Result<BatteryReading, SampleError> {
        let output = self.probe.invoke().await?;

        if !output.success {
            let status = match output.code {
                Some(code) => format!("exit code {}", code),
                None => "a signal".to_string(),
            };
            return Err(SampleError::probe_unavailable(format!(
                "probe terminated with {}",
                status
            )));
        }

        Ok(BatteryReading::parse(&output.stdout, &self.charging_marker))
    }
}
