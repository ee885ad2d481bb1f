// Echo detection and the two-strike retry policy
// Author: kelexine (https://github.com/kelexine)

use super::GenerationAttempt;
use crate::imaging::{ContentHash, ImageAsset};

/// Total attempts allowed per request: the first call plus one escalated retry.
pub const MAX_ATTEMPTS: u8 = 2;

/// Which input a candidate turned out to be a copy of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EchoSource {
    Subject,
    Reference,
}

/// Why a request gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailReason {
    NoImage,
    EchoedInput,
}

/// What to do after an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Retry,
    Fail(FailReason),
}

/// Holds the hashes of every input supplied with a request and judges each
/// attempt against them.
#[derive(Debug, Clone, Copy)]
pub struct IdentityGuard {
    subject: ContentHash,
    reference: Option<ContentHash>,
}

impl IdentityGuard {
    pub fn new(subject: &ImageAsset, reference: Option<&ImageAsset>) -> Self {
        Self {
            subject: subject.hash(),
            reference: reference.map(ImageAsset::hash),
        }
    }

    /// `Some` when `candidate` is byte-identical to one of the inputs.
    pub fn echo_of(&self, candidate: &ContentHash) -> Option<EchoSource> {
        if *candidate == self.subject {
            Some(EchoSource::Subject)
        } else if self.reference.as_ref() == Some(candidate) {
            Some(EchoSource::Reference)
        } else {
            None
        }
    }

    /// Accept a fresh image, retry a first echo, fail otherwise.
    ///
    /// A missing image is terminal on either attempt: with no candidate
    /// there is nothing to compare, so escalating would not help.
    pub fn decide(&self, attempt: &GenerationAttempt) -> Decision {
        match (&attempt.candidate_hash, attempt.echo) {
            (None, _) => Decision::Fail(FailReason::NoImage),
            (Some(_), Some(_)) if attempt.number < MAX_ATTEMPTS => Decision::Retry,
            (Some(_), Some(_)) => Decision::Fail(FailReason::EchoedInput),
            (Some(_), None) => Decision::Accept,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::ExtractedImage;
    use crate::imaging::ImageFormat;
    use crate::prompt::PromptPayload;

    fn asset(bytes: &[u8]) -> ImageAsset {
        ImageAsset::new(bytes.to_vec(), ImageFormat::Png)
    }

    fn attempt(guard: &IdentityGuard, number: u8, bytes: Option<&[u8]>) -> GenerationAttempt {
        let extracted = bytes.map(|b| ExtractedImage {
            bytes: b.to_vec(),
            mime: "image/png".to_string(),
        });
        GenerationAttempt::judge(
            guard,
            number,
            PromptPayload {
                enforce_change: number > 1,
                blocks: Vec::new(),
            },
            extracted,
        )
    }

    #[test]
    fn test_echo_of_subject_and_reference() {
        let subject = asset(b"subject");
        let reference = asset(b"reference");
        let guard = IdentityGuard::new(&subject, Some(&reference));

        assert_eq!(guard.echo_of(&subject.hash()), Some(EchoSource::Subject));
        assert_eq!(guard.echo_of(&reference.hash()), Some(EchoSource::Reference));
        assert_eq!(guard.echo_of(&ContentHash::of(b"new")), None);
    }

    #[test]
    fn test_reference_hash_ignored_when_absent() {
        let subject = asset(b"subject");
        let guard = IdentityGuard::new(&subject, None);
        assert_eq!(guard.echo_of(&ContentHash::of(b"reference")), None);
    }

    #[test]
    fn test_two_strike_policy() {
        let subject = asset(b"subject");
        let guard = IdentityGuard::new(&subject, None);

        let first = attempt(&guard, 1, Some(b"subject"));
        assert_eq!(guard.decide(&first), Decision::Retry);

        let second = attempt(&guard, 2, Some(b"subject"));
        assert_eq!(guard.decide(&second), Decision::Fail(FailReason::EchoedInput));

        let fresh = attempt(&guard, 2, Some(b"brand new"));
        assert_eq!(guard.decide(&fresh), Decision::Accept);
    }

    #[test]
    fn test_missing_image_never_retries() {
        let subject = asset(b"subject");
        let guard = IdentityGuard::new(&subject, None);

        for number in 1..=MAX_ATTEMPTS {
            let empty = attempt(&guard, number, None);
            assert_eq!(guard.decide(&empty), Decision::Fail(FailReason::NoImage));
        }
    }
}
