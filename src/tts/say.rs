//! macOS `say` backend with selectable installed voices.
//!
//! The requested voice is matched against the installed voice list
//! (`say -v ?`) case-insensitively by substring; the first match in listing
//! order wins.  When nothing matches, the engine's own default voice is used
//! and the request still succeeds.

use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::config::TtsConfig;
use crate::tts::command;
use crate::tts::engine::{EngineError, EngineName, SpeechEngine};

/// Runs the `say` executable once per request.
#[derive(Debug, Clone)]
pub struct SayEngine {
    program: String,
    /// Words-per-minute baseline, scaled by the request speed.
    base_rate: u32,
    timeout: Duration,
}

impl SayEngine {
    pub fn new(program: impl Into<String>, base_rate: u32, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            base_rate,
            timeout,
        }
    }

    pub fn from_config(config: &TtsConfig) -> Self {
        Self::new(
            config.say_program.clone(),
            config.default_rate,
            Duration::from_secs(config.engine_timeout_secs),
        )
    }

    async fn installed_voices(&self) -> Result<Vec<String>, EngineError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(["-v", "?"]);
        let output = command::run(EngineName::Say, cmd, self.timeout).await?;
        Ok(parse_voice_list(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Parse `say -v ?` output.
///
/// Each line reads `<name> <locale> # <sample sentence>`; names may contain
/// spaces, the locale never does.
pub(crate) fn parse_voice_list(listing: &str) -> Vec<String> {
    listing
        .lines()
        .filter_map(|line| {
            let head = line.split('#').next()?.trim();
            let (name, _locale) = head.rsplit_once(char::is_whitespace)?;
            let name = name.trim();
            (!name.is_empty()).then(|| name.to_string())
        })
        .collect()
}

/// First installed voice whose name contains `requested`, ignoring case.
///
/// `"default"` never matches: it selects the engine's own default.
pub(crate) fn match_voice<'a>(requested: &str, voices: &'a [String]) -> Option<&'a str> {
    if requested == "default" || requested.is_empty() {
        return None;
    }
    let needle = requested.to_lowercase();
    voices
        .iter()
        .find(|v| v.to_lowercase().contains(&needle))
        .map(String::as_str)
}

fn build_args(
    out: &Path,
    text: &str,
    voice: Option<&str>,
    rate: u32,
    sample_rate: u32,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-o".into(),
        out.as_os_str().to_owned(),
        "--file-format=WAVE".into(),
        format!("--data-format=LEI16@{sample_rate}").into(),
        "-r".into(),
        rate.to_string().into(),
    ];
    if let Some(voice) = voice {
        args.push("-v".into());
        args.push(voice.into());
    }
    args.push("--".into());
    args.push(text.into());
    args
}

#[async_trait]
impl SpeechEngine for SayEngine {
    fn name(&self) -> EngineName {
        EngineName::Say
    }

    async fn probe(&self) -> Result<(), EngineError> {
        self.installed_voices()
            .await
            .map(|voices| log::debug!("say: {} voices installed", voices.len()))
            .map_err(|e| EngineError::Unavailable {
                engine: EngineName::Say,
                reason: e.to_string(),
            })
    }

    async fn synthesize(
        &self,
        text: &str,
        voice: &str,
        speed: f64,
        sample_rate: u32,
    ) -> Result<Vec<u8>, EngineError> {
        let voices = if voice == "default" {
            Vec::new()
        } else {
            self.installed_voices().await?
        };
        let selected = match_voice(voice, &voices);
        if selected.is_none() && voice != "default" {
            log::debug!("say: no installed voice matches {voice:?}, using engine default");
        }

        let rate = (f64::from(self.base_rate) * speed) as u32;
        let scratch = command::scratch_wav(EngineName::Say)?;

        let mut cmd = Command::new(&self.program);
        cmd.args(build_args(&scratch, text, selected, rate, sample_rate));
        command::run(EngineName::Say, cmd, self.timeout).await?;

        tokio::fs::read(&scratch)
            .await
            .map_err(|e| EngineError::execution(EngineName::Say, format!("reading output: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "\
Albert              en_US    # Hello! My name is Albert.
Bad News            en_US    # Hello! My name is Bad News.
Samantha            en_US    # Hello! My name is Samantha.
Amélie              fr_CA    # Bonjour, je m’appelle Amélie.
Sam                 en_GB    # Hello! My name is Sam.
";

    fn voices() -> Vec<String> {
        parse_voice_list(LISTING)
    }

    #[test]
    fn parses_names_with_spaces_and_non_ascii() {
        assert_eq!(voices(), ["Albert", "Bad News", "Samantha", "Amélie", "Sam"]);
    }

    #[test]
    fn blank_and_garbage_lines_are_skipped() {
        assert!(parse_voice_list("\n   \n# comment only\n").is_empty());
    }

    #[test]
    fn match_is_case_insensitive_substring() {
        let v = voices();
        assert_eq!(match_voice("news", &v), Some("Bad News"));
        assert_eq!(match_voice("AMÉ", &v), Some("Amélie"));
    }

    #[test]
    fn first_match_in_listing_order_wins() {
        let v = voices();
        // "sam" matches both Samantha and Sam; Samantha is listed first.
        assert_eq!(match_voice("sam", &v), Some("Samantha"));
    }

    #[test]
    fn no_match_and_default_select_engine_default() {
        let v = voices();
        assert_eq!(match_voice("zarvox", &v), None);
        assert_eq!(match_voice("default", &v), None);
    }

    #[test]
    fn args_carry_rate_format_and_optional_voice() {
        let args = build_args(Path::new("/tmp/s.wav"), "hi", Some("Albert"), 150, 22_050);
        let args: Vec<_> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            [
                "-o",
                "/tmp/s.wav",
                "--file-format=WAVE",
                "--data-format=LEI16@22050",
                "-r",
                "150",
                "-v",
                "Albert",
                "--",
                "hi"
            ]
        );

        let args = build_args(Path::new("/tmp/s.wav"), "hi", None, 150, 16_000);
        assert!(!args.iter().any(|a| a == "-v"));
    }

    #[tokio::test]
    async fn probe_of_missing_program_is_unavailable() {
        let engine = SayEngine::new("/nonexistent/say", 150, Duration::from_secs(2));
        assert!(matches!(
            engine.probe().await,
            Err(EngineError::Unavailable { engine: EngineName::Say, .. })
        ));
    }

    // ---- Fake synthesizer ---------------------------------------------------

    #[cfg(unix)]
    mod fake {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use std::path::PathBuf;

        struct FakeSay {
            script: PathBuf,
            /// One argument per line, from the last synthesis call.
            args_log: PathBuf,
            /// One line per `-v ?` listing.
            list_log: PathBuf,
        }

        impl FakeSay {
            fn args(&self) -> Vec<String> {
                std::fs::read_to_string(&self.args_log)
                    .unwrap()
                    .lines()
                    .map(str::to_string)
                    .collect()
            }

            fn listings(&self) -> usize {
                std::fs::read_to_string(&self.list_log)
                    .map(|s| s.lines().count())
                    .unwrap_or(0)
            }

            fn engine(&self) -> SayEngine {
                SayEngine::new(self.script.to_string_lossy(), 150, Duration::from_secs(5))
            }
        }

        /// Stands in for `say`: answers `-v ?` with two voices, otherwise
        /// logs its arguments and writes a fixed payload to the `-o` path.
        fn fake_say(dir: &Path) -> FakeSay {
            let fake = FakeSay {
                script: dir.join("fake-say"),
                args_log: dir.join("args"),
                list_log: dir.join("listings"),
            };
            let contents = format!(
                "#!/bin/sh\n\
                 if [ \"$1\" = \"-v\" ] && [ \"$2\" = \"?\" ]; then\n\
                   echo listed >> '{list}'\n\
                   printf 'Albert      en_US    # Hello\\nSamantha    en_US    # Hello\\n'\n\
                   exit 0\n\
                 fi\n\
                 printf '%s\\n' \"$@\" > '{args}'\n\
                 out=\"\"\n\
                 while [ $# -gt 0 ]; do\n\
                   if [ \"$1\" = \"-o\" ]; then out=\"$2\"; fi\n\
                   shift\n\
                 done\n\
                 printf 'RIFF-say' > \"$out\"\n",
                list = fake.list_log.display(),
                args = fake.args_log.display(),
            );
            std::fs::write(&fake.script, contents).unwrap();
            std::fs::set_permissions(&fake.script, std::fs::Permissions::from_mode(0o755))
                .unwrap();
            fake
        }

        fn value_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
            let i = args.iter().position(|a| a == flag)?;
            args.get(i + 1).map(String::as_str)
        }

        #[tokio::test]
        async fn matched_voice_is_passed_and_scratch_removed() {
            let dir = tempfile::tempdir().unwrap();
            let fake = fake_say(dir.path());

            let audio = fake
                .engine()
                .synthesize("-v is a flag", "samanth", 2.0, 16_000)
                .await
                .unwrap();
            assert_eq!(audio, b"RIFF-say");
            assert_eq!(fake.listings(), 1);

            let args = fake.args();
            assert_eq!(value_after(&args, "-v"), Some("Samantha"));
            assert_eq!(value_after(&args, "-r"), Some("300"));
            assert!(args.iter().any(|a| a == "--data-format=LEI16@16000"));
            assert_eq!(&args[args.len() - 2..], ["--", "-v is a flag"]);

            let scratch = value_after(&args, "-o").unwrap();
            assert!(scratch.ends_with(".wav"));
            assert!(!Path::new(scratch).exists(), "scratch file leaked: {scratch}");
        }

        #[tokio::test]
        async fn unmatched_voice_uses_engine_default() {
            let dir = tempfile::tempdir().unwrap();
            let fake = fake_say(dir.path());

            fake.engine()
                .synthesize("hello", "zarvox", 1.0, 22_050)
                .await
                .unwrap();
            assert_eq!(fake.listings(), 1);
            assert_eq!(value_after(&fake.args(), "-v"), None);
        }

        #[tokio::test]
        async fn default_voice_skips_listing() {
            let dir = tempfile::tempdir().unwrap();
            let fake = fake_say(dir.path());

            fake.engine()
                .synthesize("hello", "default", 1.0, 22_050)
                .await
                .unwrap();
            assert_eq!(fake.listings(), 0);
            assert_eq!(value_after(&fake.args(), "-v"), None);
        }

        #[tokio::test]
        async fn probe_lists_voices() {
            let dir = tempfile::tempdir().unwrap();
            let fake = fake_say(dir.path());
            fake.engine().probe().await.unwrap();
            assert_eq!(fake.listings(), 1);
        }
    }
}
