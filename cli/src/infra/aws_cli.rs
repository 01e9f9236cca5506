//! `ProviderGateway` backed by the `aws` command-line client.
//!
//! Every call is one `aws ec2 ...` invocation routed through a
//! [`CommandRunner`]. A non-zero exit becomes a [`ProviderError`] carrying
//! the CLI's stderr, so provider messages reach callers unchanged.

use std::process::Output;
use std::time::Duration;

use async_trait::async_trait;
use fleetspot_common::{AwsCliConfig, Tag};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::application::ports::{CommandRunner, ProviderGateway, Reservation, SpotRequestRecord};
use crate::domain::ProviderError;
use crate::infra::command_runner::TokioCommandRunner;

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct DescribeSpotInstanceRequestsOutput {
    spot_instance_requests: Vec<WireSpotRequest>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct WireSpotRequest {
    instance_id: Option<String>,
    state: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct DescribeInstancesOutput {
    reservations: Vec<WireReservation>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct WireReservation {
    reservation_id: Option<String>,
    instances: Vec<WireInstance>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct WireInstance {
    instance_id: Option<String>,
}

impl From<WireSpotRequest> for SpotRequestRecord {
    fn from(w: WireSpotRequest) -> Self {
        Self {
            instance_id: w.instance_id,
            state: w.state,
        }
    }
}

impl From<WireReservation> for Reservation {
    fn from(w: WireReservation) -> Self {
        Self {
            reservation_id: w.reservation_id,
            instance_ids: w.instances.into_iter().filter_map(|i| i.instance_id).collect(),
        }
    }
}

// ── Gateway ───────────────────────────────────────────────────────────────────

/// Provider gateway that shells out to `aws ec2`.
///
/// Generic over `R: CommandRunner` so that tests can inject a mock runner
/// without spawning real processes.
pub struct AwsCliGateway<R: CommandRunner> {
    runner: R,
    program: String,
    region: String,
    profile: Option<String>,
    command_timeout: Duration,
    wait_timeout: Duration,
}

impl<R: CommandRunner> AwsCliGateway<R> {
    pub fn new(runner: R, region: impl Into<String>, config: &AwsCliConfig) -> Self {
        Self {
            runner,
            program: config.program.clone(),
            region: region.into(),
            profile: config.profile.clone(),
            command_timeout: Duration::from_secs(config.command_timeout_secs),
            wait_timeout: Duration::from_secs(config.wait_timeout_secs),
        }
    }

    /// `ec2 <subcommand...> --region <r> [--profile <p>]`
    fn ec2_args<'a>(&'a self, subcommand: &[&'a str]) -> Vec<&'a str> {
        let mut args = Vec::with_capacity(subcommand.len() + 5);
        args.push("ec2");
        args.extend_from_slice(subcommand);
        args.extend(["--region", self.region.as_str()]);
        if let Some(profile) = &self.profile {
            args.extend(["--profile", profile.as_str()]);
        }
        args
    }

    async fn invoke(&self, args: &[&str], timeout: Duration) -> Result<Vec<u8>, ProviderError> {
        tracing::debug!(program = %self.program, ?args, "invoking aws cli");
        let output = self
            .runner
            .run_with_timeout(&self.program, args, timeout)
            .await
            .map_err(|e| ProviderError::new(format!("{e:#}")))?;
        if output.status.success() {
            Ok(output.stdout)
        } else {
            Err(self.exit_error(&output))
        }
    }

    fn exit_error(&self, output: &Output) -> ProviderError {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        if stderr.is_empty() {
            ProviderError::new(format!("{} exited with {}", self.program, output.status))
        } else {
            ProviderError::new(stderr)
        }
    }
}

impl AwsCliGateway<TokioCommandRunner> {
    /// Production gateway backed by `TokioCommandRunner`.
    #[must_use]
    pub fn from_config(region: impl Into<String>, config: &AwsCliConfig) -> Self {
        let runner = TokioCommandRunner::new(Duration::from_secs(config.command_timeout_secs));
        Self::new(runner, region, config)
    }
}

fn parse_json<T: DeserializeOwned + Default>(
    stdout: &[u8],
    operation: &str,
) -> Result<T, ProviderError> {
    if stdout.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(stdout)
        .map_err(|e| ProviderError::new(format!("invalid JSON from aws ec2 {operation}: {e}")))
}

#[async_trait]
impl<R: CommandRunner> ProviderGateway for AwsCliGateway<R> {
    async fn wait_until_fulfilled(&self, request_id: &str) -> Result<(), ProviderError> {
        let args = self.ec2_args(&[
            "wait",
            "spot-instance-request-fulfilled",
            "--spot-instance-request-ids",
            request_id,
        ]);
        self.invoke(&args, self.wait_timeout).await.map(drop)
    }

    async fn describe_spot_requests(
        &self,
        request_id: &str,
    ) -> Result<Vec<SpotRequestRecord>, ProviderError> {
        let args = self.ec2_args(&[
            "describe-spot-instance-requests",
            "--spot-instance-request-ids",
            request_id,
            "--output",
            "json",
        ]);
        let stdout = self.invoke(&args, self.command_timeout).await?;
        let parsed: DescribeSpotInstanceRequestsOutput =
            parse_json(&stdout, "describe-spot-instance-requests")?;
        Ok(parsed
            .spot_instance_requests
            .into_iter()
            .map(SpotRequestRecord::from)
            .collect())
    }

    async fn describe_instances(&self, instance_id: &str) -> Result<Vec<Reservation>, ProviderError> {
        let args = self.ec2_args(&[
            "describe-instances",
            "--instance-ids",
            instance_id,
            "--output",
            "json",
        ]);
        let stdout = self.invoke(&args, self.command_timeout).await?;
        let parsed: DescribeInstancesOutput = parse_json(&stdout, "describe-instances")?;
        Ok(parsed.reservations.into_iter().map(Reservation::from).collect())
    }

    async fn create_tags(&self, resource_id: &str, tags: &[Tag]) -> Result<(), ProviderError> {
        let tags_json = serde_json::to_string(tags)
            .map_err(|e| ProviderError::new(format!("cannot encode tags: {e}")))?;
        let args = self.ec2_args(&[
            "create-tags",
            "--resources",
            resource_id,
            "--tags",
            &tags_json,
        ]);
        self.invoke(&args, self.command_timeout).await.map(drop)
    }
}
