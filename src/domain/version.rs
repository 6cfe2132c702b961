use crate::analyzer::VersionBump;
use crate::domain::stage::{Stages, FINAL};
use crate::error::{BrauError, Result};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// The part of a version a bump advances
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BumpPart {
    Major,
    Minor,
    Patch,
    /// Advance to, or iterate within, a configured stage
    Stage(String),
}

impl From<&str> for BumpPart {
    fn from(part: &str) -> Self {
        match part {
            "major" => BumpPart::Major,
            "minor" => BumpPart::Minor,
            "patch" => BumpPart::Patch,
            stage => BumpPart::Stage(stage.to_string()),
        }
    }
}

impl From<VersionBump> for BumpPart {
    fn from(bump: VersionBump) -> Self {
        match bump {
            VersionBump::Major => BumpPart::Major,
            VersionBump::Minor => BumpPart::Minor,
            VersionBump::Patch => BumpPart::Patch,
        }
    }
}

impl fmt::Display for BumpPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpPart::Major => write!(f, "major"),
            BumpPart::Minor => write!(f, "minor"),
            BumpPart::Patch => write!(f, "patch"),
            BumpPart::Stage(stage) => write!(f, "{}", stage),
        }
    }
}

/// Staged semantic version: `major.minor.patch` plus a stage and its iteration number.
///
/// Built once against a [`Stages`] table, which fixes its rank and canonical string.
/// Equality and ordering only look at `(major, minor, patch, stage rank, n)`, so two
/// different spellings of the same version compare equal.
#[derive(Debug, Clone)]
pub struct Version {
    major: u32,
    minor: u32,
    patch: u32,
    stage: String,
    n: u32,
    rank: usize,
    string: String,
}

impl Version {
    /// Parse a version string such as `1.2.3`, `1.2`, `1.0.0.dev0` or `2.0.0beta3`.
    ///
    /// Grammar: `major("."minor("."patch)?)?("."?stage_letters n)?`. Missing minor and
    /// patch default to 0; no stage suffix means the final stage.
    ///
    /// # Returns
    /// * `Ok(Version)` - Parsed and ranked against `stages`
    /// * `Err(InvalidVersionString)` - If the string does not follow the grammar
    /// * `Err(UnknownStage)` - If the stage letters are not a key of `stages`
    pub fn parse(string: &str, stages: &Stages) -> Result<Self> {
        let invalid = || BrauError::InvalidVersionString(string.to_string());

        let captures = Regex::new(r"^(\d+)(?:\.(\d+)(?:\.(\d+))?)?(?:\.?([a-z]+)(\d+))?$")
            .ok()
            .and_then(|re| re.captures(string))
            .ok_or_else(invalid)?;

        let number = |index: usize| -> Result<u32> {
            match captures.get(index) {
                Some(m) => m.as_str().parse::<u32>().map_err(|_| invalid()),
                None => Ok(0),
            }
        };

        let major = number(1)?;
        let minor = number(2)?;
        let patch = number(3)?;
        let n = number(5)?;

        let stage = match captures.get(4) {
            Some(letters) => stages
                .by_key(letters.as_str())
                .ok_or_else(|| BrauError::unknown_stage(letters.as_str()))?
                .key
                .clone(),
            None => FINAL.to_string(),
        };

        Self::build(major, minor, patch, &stage, n, stages)
    }

    /// Build a version from explicit components.
    ///
    /// `stage` defaults to `final`; it may be given as a stage key or label.
    pub fn new(
        major: u32,
        minor: u32,
        patch: u32,
        stage: Option<&str>,
        n: u32,
        stages: &Stages,
    ) -> Result<Self> {
        let stage = stage.unwrap_or(FINAL);
        let key = stages
            .get(stage)
            .ok_or_else(|| BrauError::unknown_stage(stage))?
            .key
            .clone();

        Self::build(major, minor, patch, &key, n, stages)
    }

    /// The `0.0.0` final version used when nothing was released yet
    pub fn zero(stages: &Stages) -> Result<Self> {
        Self::new(0, 0, 0, None, 0, stages)
    }

    fn build(major: u32, minor: u32, patch: u32, key: &str, n: u32, stages: &Stages) -> Result<Self> {
        let rank = stages
            .rank(key)
            .ok_or_else(|| BrauError::unknown_stage(key))?;
        let stage = stages
            .by_key(key)
            .ok_or_else(|| BrauError::unknown_stage(key))?;

        // The iteration number only means something for pre-releases
        let n = if stage.is_final() { 0 } else { n };
        let string = stage.format(major, minor, patch, n);

        Ok(Version {
            major,
            minor,
            patch,
            stage: stage.key.clone(),
            n,
            rank,
            string,
        })
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn patch(&self) -> u32 {
        self.patch
    }

    /// Stage key (`final` for stable releases)
    pub fn stage(&self) -> &str {
        &self.stage
    }

    /// Pre-release iteration number, always 0 for final versions
    pub fn n(&self) -> u32 {
        self.n
    }

    /// Canonical serialization produced by the stage template
    pub fn as_str(&self) -> &str {
        &self.string
    }

    pub fn is_final(&self) -> bool {
        self.stage == FINAL
    }

    /// Ordering key; the stage rank sits between patch and n
    pub fn key(&self) -> (u32, u32, u32, usize, u32) {
        (self.major, self.minor, self.patch, self.rank, self.n)
    }

    /// Return the version that follows this one for the requested bump.
    ///
    /// - `major`, `minor`, `patch`: only from a final version; zeroes the less
    ///   significant components.
    /// - A stage: the same stage increments `n`, a later stage starts at `n = 0`.
    ///
    /// # Returns
    /// * `Ok(Version)` - The new version; `self` is left untouched
    /// * `Err(InvalidBump)` - Numeric bump on a pre-release, move to an earlier
    ///   stage, `final` to `final`, or a component already at `u32::MAX`
    /// * `Err(UnknownStage)` - If the stage is not in `stages`
    pub fn bump(&self, part: &BumpPart, stages: &Stages) -> Result<Version> {
        let (major, minor, patch) = match part {
            BumpPart::Major | BumpPart::Minor | BumpPart::Patch if !self.is_final() => {
                return Err(BrauError::invalid_bump(format!(
                    "{} is a pre-release version, can't do a {} bump",
                    self, part
                )));
            }
            BumpPart::Major => (self.increment(self.major, part)?, 0, 0),
            BumpPart::Minor => (self.major, self.increment(self.minor, part)?, 0),
            BumpPart::Patch => (self.major, self.minor, self.increment(self.patch, part)?),
            BumpPart::Stage(name) => return self.bump_stage(name, stages),
        };

        Self::build(major, minor, patch, FINAL, 0, stages)
    }

    /// `component + 1`, an `InvalidBump` when it would overflow
    fn increment(&self, component: u32, part: &BumpPart) -> Result<u32> {
        component.checked_add(1).ok_or_else(|| {
            BrauError::invalid_bump(format!("{} bump of {} overflows", part, self))
        })
    }

    fn bump_stage(&self, name: &str, stages: &Stages) -> Result<Version> {
        let target = stages
            .get(name)
            .ok_or_else(|| BrauError::unknown_stage(name))?;

        if target.is_final() && self.is_final() {
            return Err(BrauError::invalid_bump(format!(
                "{} is already in the final stage",
                self
            )));
        }

        if target.key == self.stage {
            let n = self.increment(self.n, &BumpPart::Stage(name.to_string()))?;
            return Self::build(self.major, self.minor, self.patch, &self.stage, n, stages);
        }

        let current_rank = stages
            .rank(&self.stage)
            .ok_or_else(|| BrauError::unknown_stage(&self.stage))?;
        let target_rank = stages
            .rank(&target.key)
            .ok_or_else(|| BrauError::unknown_stage(&target.key))?;

        if target_rank < current_rank {
            return Err(BrauError::invalid_bump(format!(
                "cannot move {} to the earlier stage {}",
                self, target.label
            )));
        }

        Self::build(self.major, self.minor, self.patch, &target.key, 0, stages)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.string)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// What the next release should be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseTarget {
    /// Bump by the given level (usually derived from the commits)
    Bump(VersionBump),
    /// Release exactly this version string
    Exact(String),
}

/// Resolve the version that follows `current`.
///
/// - An exact version must be strictly greater than `current`.
/// - A non-final `stage` on a final `current` bumps first, then opens that stage at 0.
/// - A `stage` on a pre-release advances or iterates that stage.
/// - A pre-release without `stage` iterates its own stage.
/// - Otherwise the bump level is applied.
pub fn next_version(
    current: &Version,
    target: &ReleaseTarget,
    stage: Option<&str>,
    stages: &Stages,
) -> Result<Version> {
    let bump = match target {
        ReleaseTarget::Exact(string) => {
            let version = Version::parse(string, stages)?;
            if version <= *current {
                return Err(BrauError::invalid_bump(format!(
                    "{} is not greater than the current version {}",
                    version, current
                )));
            }
            return Ok(version);
        }
        ReleaseTarget::Bump(bump) => BumpPart::from(*bump),
    };

    match stage {
        Some(stage) if current.is_final() => {
            let bumped = current.bump(&bump, stages)?;
            let target = stages
                .get(stage)
                .ok_or_else(|| BrauError::unknown_stage(stage))?;
            if target.is_final() {
                return Ok(bumped);
            }
            Version::new(
                bumped.major(),
                bumped.minor(),
                bumped.patch(),
                Some(&target.key),
                0,
                stages,
            )
        }
        Some(stage) => current.bump(&BumpPart::Stage(stage.to_string()), stages),
        None if !current.is_final() => {
            current.bump(&BumpPart::Stage(current.stage().to_string()), stages)
        }
        None => current.bump(&bump, stages),
    }
}
