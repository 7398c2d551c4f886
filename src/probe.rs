//! Accelerator discovery.
//!
//! GPUs are discovered through `nvidia-smi`. Nothing here fails: a host
//! without the tool, without drivers or with every device hidden simply
//! reports no accelerators and training runs on the CPU.

use serde::Serialize;
use tracing::debug;

use crate::context::ServiceContext;
use crate::ports::command::CommandRunner;

const NVIDIA_SMI: &str = "nvidia-smi";
const QUERY_ARGS: &[&str] = &["--query-gpu=index,name", "--format=csv,noheader"];

/// One compute device visible to the training scripts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Accelerator {
    /// Device name as training frameworks address it (`GPU:<index>`).
    pub name: String,
    /// Model description, when the driver reported one.
    pub label: Option<String>,
}

/// Result of a probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcceleratorInfo {
    /// Devices found, in driver order.
    pub accelerators: Vec<Accelerator>,
    /// `true` when devices were hidden by `CUDA_VISIBLE_DEVICES`.
    pub hidden: bool,
}

impl AcceleratorInfo {
    /// Returns `true` when no accelerator is usable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accelerators.is_empty()
    }
}

/// Probes the accelerators visible to child processes of this one.
#[must_use]
pub fn probe(ctx: &ServiceContext) -> AcceleratorInfo {
    let visible = std::env::var("CUDA_VISIBLE_DEVICES").ok();
    probe_with(ctx.commands.as_ref(), visible.as_deref())
}

/// Probes through `runner`, honouring a `CUDA_VISIBLE_DEVICES` value.
///
/// An empty value or `-1` hides every device, as CUDA itself does.
#[must_use]
pub fn probe_with(runner: &dyn CommandRunner, visible_devices: Option<&str>) -> AcceleratorInfo {
    if let Some(visible) = visible_devices.map(str::trim) {
        if visible.is_empty() || visible == "-1" {
            debug!(visible, "accelerators hidden by CUDA_VISIBLE_DEVICES");
            return AcceleratorInfo { accelerators: Vec::new(), hidden: true };
        }
    }

    let output = match runner.run(NVIDIA_SMI, QUERY_ARGS) {
        Ok(output) if output.success() => output,
        Ok(output) => {
            debug!(exit_code = output.exit_code, stderr = %output.stderr.trim(), "nvidia-smi failed");
            return AcceleratorInfo { accelerators: Vec::new(), hidden: false };
        }
        Err(err) => {
            debug!(error = %err, "nvidia-smi unavailable");
            return AcceleratorInfo { accelerators: Vec::new(), hidden: false };
        }
    };

    let accelerators = output
        .stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(position, row)| parse_row(position, row))
        .collect();
    AcceleratorInfo { accelerators, hidden: false }
}

/// Parses one `index, name` row. A row that cannot be split still yields
/// a device, named by its position and without a label.
fn parse_row(position: usize, row: &str) -> Accelerator {
    let Some((index, label)) = row.split_once(',') else {
        return Accelerator { name: format!("GPU:{position}"), label: None };
    };
    let index = index.trim().parse::<usize>().unwrap_or(position);
    let label = Some(label.trim()).filter(|l| !l.is_empty()).map(str::to_string);
    Accelerator { name: format!("GPU:{index}"), label }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::fakes::CannedCommands;
    use crate::ports::command::CommandOutput;

    fn smi(stdout: &str, exit_code: i32) -> CannedCommands {
        CannedCommands(Some(CommandOutput {
            exit_code,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }))
    }

    #[test]
    fn parses_devices_in_order() {
        let runner = smi("0, NVIDIA A100-SXM4-40GB\n1, NVIDIA A100-SXM4-40GB\n", 0);
        let info = probe_with(&runner, None);

        assert_eq!(info.accelerators.len(), 2);
        assert_eq!(info.accelerators[0].name, "GPU:0");
        assert_eq!(info.accelerators[1].name, "GPU:1");
        assert_eq!(info.accelerators[1].label.as_deref(), Some("NVIDIA A100-SXM4-40GB"));
        assert!(!info.hidden);
    }

    #[test]
    fn unlabelled_rows_keep_their_name() {
        let runner = smi("garbage\n3,\n", 0);
        let info = probe_with(&runner, None);

        assert_eq!(
            info.accelerators,
            vec![
                Accelerator { name: "GPU:0".into(), label: None },
                Accelerator { name: "GPU:3".into(), label: None },
            ]
        );
    }

    #[test]
    fn missing_tool_means_cpu_only() {
        let info = probe_with(&CannedCommands(None), None);
        assert!(info.is_empty());
        assert!(!info.hidden);
    }

    #[test]
    fn failing_tool_means_cpu_only() {
        let runner = smi("", 9);
        assert!(probe_with(&runner, None).is_empty());
    }

    #[test]
    fn cuda_visible_devices_can_hide_everything() {
        let runner = smi("0, Tesla T4\n", 0);

        assert!(probe_with(&runner, Some("")).hidden);
        assert!(probe_with(&runner, Some("-1")).is_empty());
        assert_eq!(probe_with(&runner, Some("0")).accelerators.len(), 1);
    }
}
