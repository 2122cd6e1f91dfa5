use std::path::{Path, PathBuf};

use pactest_core::{
    api::{EvalWithPacInput, v1},
    engine::EngineFlag,
    eval::{EngineResult, EvalResponse, EvalStatus},
};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{error, info, warn};
use url::Url;
use walkdir::WalkDir;

use crate::{
    cases::{TestCase, load_case_file},
    pattern::WildcardPattern,
};

pub const CASE_FILE_SUFFIX: &str = ".test.csv";

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub tests_dir: PathBuf,
    pub pacs_dir: PathBuf,
    pub server: Url,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("server url {0} cannot carry a path")]
    ServerUrl(String),
    #[error("failed to build http client")]
    Client(#[source] reqwest::Error),
    #[error("failed to scan {path}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Outcome of judging one engine result against one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail(String),
    Skip(String),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunSummary {
    fn record(&mut self, verdict: &Verdict) {
        match verdict {
            Verdict::Pass => self.passed += 1,
            Verdict::Fail(_) => self.failed += 1,
            Verdict::Skip(_) => self.skipped += 1,
        }
    }

    /// Process exit status: the failure count, saturating at 255.
    pub fn exit_code(&self) -> u8 {
        u8::try_from(self.failed).unwrap_or(u8::MAX)
    }
}

/// Judges a single engine's result. The aggregate status of the response is
/// not consulted.
pub fn judge(case: &TestCase, result: &EngineResult) -> Verdict {
    if let Some(required) = case.required_flag()
        && !result.flags.iter().any(|flag| flag.as_str() == required)
    {
        return Verdict::Skip(format!("engine lacks flag {required}"));
    }

    if result.status != EvalStatus::Success {
        let reason = result
            .message
            .as_deref()
            .or(result.error.as_deref())
            .unwrap_or("no error detail");
        return Verdict::Fail(format!("engine failed: {reason}"));
    }

    if result.has_flag(EngineFlag::Evaluation) {
        let proxy = result.proxy.as_deref().unwrap_or_default();
        if proxy != case.expected_output {
            return Verdict::Fail(format!(
                "expected {:?}, got {:?}",
                case.expected_output, proxy
            ));
        }
    }

    Verdict::Pass
}

/// All `*.test.csv` files under `dir`, sorted.
pub fn discover_case_files(dir: &Path) -> Result<Vec<PathBuf>, RunError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|source| RunError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        let is_case_file = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(CASE_FILE_SUFFIX));
        if entry.file_type().is_file() && is_case_file {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Every file under `dir` as a `/`-separated path relative to `dir`, sorted.
pub fn discover_pacs(dir: &Path) -> Result<Vec<String>, RunError> {
    let mut pacs = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|source| RunError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(dir) else {
            continue;
        };
        let parts: Vec<_> = relative
            .components()
            .map(|part| part.as_os_str().to_string_lossy())
            .collect();
        pacs.push(parts.join("/"));
    }
    pacs.sort();
    Ok(pacs)
}

/// `<server>/api/v1/eval`, keeping any path prefix the server is mounted under.
fn eval_endpoint(server: &Url) -> Result<Url, RunError> {
    let mut endpoint = server.clone();
    endpoint
        .path_segments_mut()
        .map_err(|()| RunError::ServerUrl(server.to_string()))?
        .pop_if_empty()
        .extend(v1::eval::INLINE.split('/').filter(|part| !part.is_empty()));
    Ok(endpoint)
}

struct Replayer {
    client: reqwest::Client,
    endpoint: Url,
}

impl Replayer {
    fn new(server: &Url) -> Result<Self, RunError> {
        let endpoint = eval_endpoint(server)?;
        let client = reqwest::Client::builder()
            .build()
            .map_err(RunError::Client)?;
        Ok(Self { client, endpoint })
    }

    async fn evaluate(&self, case: &TestCase, content: String) -> Result<EvalResponse, String> {
        let body = EvalWithPacInput {
            content,
            dest_host: case.dest_host.clone(),
            src_ip: case.src_ip.clone(),
        };
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(|err| format!("request failed: {err}"))?;

        let status = response.status();
        if status != StatusCode::OK {
            let text = response.text().await.unwrap_or_default();
            return Err(format!("server answered {status}: {text}"));
        }

        response
            .json::<EvalResponse>()
            .await
            .map_err(|err| format!("unreadable evaluation response: {err}"))
    }
}

/// Replays every case under `tests_dir` against the server.
pub async fn run(options: &RunOptions) -> Result<RunSummary, RunError> {
    let replayer = Replayer::new(&options.server)?;
    let pacs = discover_pacs(&options.pacs_dir)?;
    let mut summary = RunSummary::default();

    for case_file in discover_case_files(&options.tests_dir)? {
        let cases = match load_case_file(&case_file) {
            Ok(cases) => cases,
            Err(err) => {
                error!(file = %case_file.display(), "skipping case file: {err}");
                continue;
            }
        };
        info!(file = %case_file.display(), cases = cases.len(), "running case file");

        for case in &cases {
            run_case(&replayer, options, &pacs, case, &mut summary).await;
        }
    }

    info!(
        passed = summary.passed,
        failed = summary.failed,
        skipped = summary.skipped,
        "run finished"
    );
    Ok(summary)
}

async fn run_case(
    replayer: &Replayer,
    options: &RunOptions,
    pacs: &[String],
    case: &TestCase,
    summary: &mut RunSummary,
) {
    let pattern = match WildcardPattern::new(&case.file) {
        Ok(pattern) => pattern,
        Err(err) => {
            error!(case = %case.id, file = %case.file, "FAIL invalid file pattern: {err}");
            summary.record(&Verdict::Fail(err.to_string()));
            return;
        }
    };

    let matched: Vec<&String> = pacs.iter().filter(|pac| pattern.matches(pac)).collect();
    if matched.is_empty() {
        warn!(case = %case.id, file = %case.file, "no PAC files match");
        return;
    }

    for pac in matched {
        let path = options.pacs_dir.join(pac);
        let outcome = match tokio::fs::read_to_string(&path).await {
            Ok(content) => replayer.evaluate(case, content).await,
            Err(err) => Err(format!("cannot read {}: {err}", path.display())),
        };

        let response = match outcome {
            Ok(response) => response,
            Err(reason) => {
                error!(case = %case.id, pac = %pac, "FAIL {reason}");
                summary.record(&Verdict::Fail(reason));
                continue;
            }
        };

        for result in &response.results {
            let verdict = judge(case, result);
            match &verdict {
                Verdict::Pass => {
                    info!(case = %case.id, pac = %pac, engine = %result.engine, "PASS")
                }
                Verdict::Skip(reason) => {
                    info!(case = %case.id, pac = %pac, engine = %result.engine, "SKIP {reason}")
                }
                Verdict::Fail(reason) => {
                    error!(case = %case.id, pac = %pac, engine = %result.engine, "FAIL {reason}")
                }
            }
            summary.record(&verdict);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn case(expected: &str, required_flags: &str) -> TestCase {
        TestCase {
            id: "1".into(),
            description: "d".into(),
            file: "*.pac".into(),
            dest_host: "example.com".into(),
            src_ip: "10.0.0.1".into(),
            expected_output: expected.into(),
            required_flags: required_flags.into(),
        }
    }

    fn result(status: EvalStatus, flags: Vec<EngineFlag>, proxy: Option<&str>) -> EngineResult {
        EngineResult {
            engine: "v8".into(),
            status,
            flags,
            error_code: None,
            error: None,
            message: Some("boom".into()),
            proxy: proxy.map(String::from),
        }
    }

    #[test]
    fn evaluation_engine_must_return_expected_proxy() {
        let ok = result(EvalStatus::Success, vec![EngineFlag::Evaluation], Some("DIRECT"));
        assert_eq!(judge(&case("DIRECT", ""), &ok), Verdict::Pass);
        assert!(matches!(
            judge(&case("PROXY p:3128", ""), &ok),
            Verdict::Fail(_)
        ));
    }

    #[test]
    fn validation_engine_passes_on_success_alone() {
        let lint = result(EvalStatus::Success, vec![EngineFlag::Validation], None);
        assert_eq!(judge(&case("DIRECT", ""), &lint), Verdict::Pass);
    }

    #[test]
    fn failed_engine_fails_case() {
        let failed = result(EvalStatus::Failed, vec![EngineFlag::Validation], None);
        assert_eq!(
            judge(&case("DIRECT", ""), &failed),
            Verdict::Fail("engine failed: boom".into())
        );
    }

    #[test]
    fn missing_required_flag_skips_before_status_check() {
        let failed = result(EvalStatus::Failed, vec![EngineFlag::Evaluation], None);
        assert!(matches!(
            judge(&case("DIRECT", "src_ip"), &failed),
            Verdict::Skip(_)
        ));

        let capable = result(
            EvalStatus::Success,
            vec![EngineFlag::Evaluation, EngineFlag::SrcIp],
            Some("DIRECT"),
        );
        assert_eq!(judge(&case("DIRECT", "src_ip"), &capable), Verdict::Pass);
    }

    #[test]
    fn eval_endpoint_keeps_server_prefix() {
        let root = Url::parse("http://127.0.0.1:8080").unwrap();
        assert_eq!(
            eval_endpoint(&root).unwrap().as_str(),
            "http://127.0.0.1:8080/api/v1/eval"
        );

        for server in ["http://gw.example/pactest/", "http://gw.example/pactest"] {
            let endpoint = eval_endpoint(&Url::parse(server).unwrap()).unwrap();
            assert_eq!(endpoint.as_str(), "http://gw.example/pactest/api/v1/eval");
        }
    }

    #[test]
    fn eval_endpoint_rejects_opaque_urls() {
        let opaque = Url::parse("mailto:ops@example.com").unwrap();
        assert!(matches!(eval_endpoint(&opaque), Err(RunError::ServerUrl(_))));
    }

    #[test]
    fn exit_code_saturates() {
        let summary = RunSummary {
            failed: 300,
            ..RunSummary::default()
        };
        assert_eq!(summary.exit_code(), 255);
        assert_eq!(RunSummary::default().exit_code(), 0);
    }

    #[test]
    fn discovery_is_sorted_and_relative() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("corp/eu")).unwrap();
        fs::write(dir.path().join("b.pac"), "x").unwrap();
        fs::write(dir.path().join("corp/eu/a.pac"), "x").unwrap();
        fs::write(dir.path().join("corp/z.test.csv"), "x").unwrap();
        fs::write(dir.path().join("a.test.csv"), "x").unwrap();
        fs::write(dir.path().join("notes.csv"), "x").unwrap();

        let pacs = discover_pacs(dir.path()).unwrap();
        assert!(pacs.contains(&"corp/eu/a.pac".to_string()));
        assert!(pacs.windows(2).all(|pair| pair[0] <= pair[1]));

        let cases = discover_case_files(dir.path()).unwrap();
        assert_eq!(
            cases,
            vec![dir.path().join("a.test.csv"), dir.path().join("corp/z.test.csv")]
        );
    }
}
