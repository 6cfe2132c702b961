// tests/integration_test.rs
use anyhow::Result;
use braulio::analyzer::ReleaseAnalyzer;
use braulio::cli::{run_release, ReleaseArgs, ReleaseStatus};
use braulio::config::Config;
use braulio::domain::{parse_commits, LabelPattern, LabelPosition, Stages};
use braulio::git::{Git2Repository, Repository};
use braulio::ui::Prompter;
use braulio::VersionBump;
use chrono::NaiveDate;
use git2::{Repository as Git2Repo, Signature};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

struct Yes;

impl Prompter for Yes {
    fn confirm(&self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
}

fn init_repo(dir: &Path) -> Git2Repo {
    let repo = Git2Repo::init(dir).unwrap();
    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Test User").unwrap();
    config.set_str("user.email", "test@example.com").unwrap();
    repo
}

/// Write `file` and commit it with `message`
fn commit_file(repo: &Git2Repo, file: &str, content: &str, message: &str) {
    let workdir = repo.workdir().unwrap().to_path_buf();
    fs::write(workdir.join(file), content).unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new(file)).unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();

    let signature = Signature::now("Test User", "test@example.com").unwrap();
    let parent = repo.head().ok().map(|head| head.peel_to_commit().unwrap());
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

    repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
        .unwrap();
}

fn tag_head(repo: &Git2Repo, name: &str) {
    let head = repo.head().unwrap().peel_to_commit().unwrap();
    repo.tag_lightweight(name, head.as_object(), false).unwrap();
}

#[test]
fn test_fixture_log_parses() {
    let log = fs::read_to_string("tests/fixtures/commits.txt").unwrap();
    let commits = parse_commits(&log);

    assert_eq!(commits.len(), 4);
    assert_eq!(commits[0].header, "Merge branch 'feature/drinks'");
    assert_eq!(commits[1].footer, "!feat:drinks");
    assert!(commits[2].message.contains("BREAKING CHANGE"));

    let analyzer = ReleaseAnalyzer::new(
        LabelPattern::new("!{action}:{scope}").unwrap(),
        LabelPosition::Footer,
    )
    .unwrap();
    let data = analyzer.analyze_commits(commits);

    assert_eq!(data.tree.len(), 3);
    assert_eq!(data.tree.bump_version_to(), VersionBump::Major);
}

#[test]
fn test_git2_log_and_tags() {
    let dir = TempDir::new().unwrap();
    let git = init_repo(dir.path());
    let repo = Git2Repository::from_git2(Git2Repo::open(dir.path()).unwrap());

    assert_eq!(repo.log(None, None).unwrap(), "");
    assert!(repo.tags().unwrap().is_empty());

    commit_file(&git, "README.md", "# demo\n", "Initial commit");
    tag_head(&git, "v0.1.0");
    commit_file(&git, "main.py", "print()\n", "Add entry point\n\n!feat:cli");

    let tags = repo.tags().unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].name, "v0.1.0");

    let commits = parse_commits(&repo.log(Some("v0.1.0"), None).unwrap());
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].header, "Add entry point");
    assert_eq!(commits[0].footer, "!feat:cli");
    assert_eq!(commits[0].hash.len(), 40);

    assert_eq!(parse_commits(&repo.log(None, None).unwrap()).len(), 2);
}

#[test]
fn test_git2_release_end_to_end() {
    let dir = TempDir::new().unwrap();
    let git = init_repo(dir.path());

    commit_file(&git, "HISTORY.rst", "History\n=======\n\n", "Add changelog");
    commit_file(&git, "setup.py", "setup(version='1.0.0')\n", "Add setup");
    tag_head(&git, "v1.0.0");
    commit_file(&git, "api.py", "pass\n", "Fix api import\n\n!fix:api");

    let repo = Git2Repository::open(dir.path()).unwrap();
    let mut args = ReleaseArgs::from_config(&Config::default());
    args.changelog_file = dir.path().join("HISTORY.rst");
    args.files = vec![dir.path().join("setup.py")];
    args.date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

    let report = run_release(&repo, &args, &Stages::default(), &Yes).unwrap();
    match report.status {
        ReleaseStatus::Released(outcome) => {
            assert_eq!(outcome.new.as_str(), "1.0.1");
            assert_eq!(outcome.tag.as_deref(), Some("v1.0.1"));
        }
        other => panic!("expected a release, got: {:?}", other),
    }

    let head = git.head().unwrap().peel_to_commit().unwrap();
    assert_eq!(head.message(), Some("Release version 1.0.1"));

    let tags = repo.tags().unwrap();
    assert!(tags.iter().any(|tag| tag.name == "v1.0.1"));
    let tagged = git
        .revparse_single("v1.0.1")
        .unwrap()
        .peel_to_commit()
        .unwrap();
    assert_eq!(tagged.id(), head.id());

    let statuses = git.statuses(None).unwrap();
    assert!(statuses.is_empty(), "Release files should be committed");

    assert_eq!(
        fs::read_to_string(dir.path().join("setup.py")).unwrap(),
        "setup(version='1.0.1')\n"
    );
    let changelog = fs::read_to_string(dir.path().join("HISTORY.rst")).unwrap();
    assert!(changelog.contains("1.0.1 (2024-03-01)"));
    assert!(changelog.contains("* api - Fix api import"));

    // Nothing new after the release
    let report = run_release(&repo, &args, &Stages::default(), &Yes).unwrap();
    assert_eq!(report.status, ReleaseStatus::NothingToRelease);
}
