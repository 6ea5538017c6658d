//! Lifecycle of a classroom poll: `Started -> Stopped -> Ended`.
//!
//! A poll lives in the room state as `current_polling`. Ending a poll
//! archives it and clears `current_polling`; the next poll starts a fresh
//! lifecycle. Resetting discards the poll without archiving.

use std::collections::HashSet;

use bson::DateTime;
use liveroom_config::LiveRoomSettings;
use liveroom_db::models::{
    CurrentPolling, LessonMemberState, LessonPolling, PollingOption, PollingStatus, StudentAnswer,
};

use super::error::{LiveRoomError, LiveRoomResult};

pub fn validate_options(options: &[PollingOption], limits: &LiveRoomSettings) -> LiveRoomResult<()> {
    if options.len() < limits.min_polling_options {
        return Err(LiveRoomError::validation(format!(
            "Option must be at least {}",
            limits.min_polling_options
        )));
    }
    if options.len() > limits.max_polling_options {
        return Err(LiveRoomError::validation(format!(
            "Option can not be larger than {}",
            limits.max_polling_options
        )));
    }

    let mut seen = HashSet::with_capacity(options.len());
    for option in options {
        if option.answer.trim().is_empty() {
            return Err(LiveRoomError::validation("Option answer can not be empty"));
        }
        if !seen.insert(option.answer.as_str()) {
            return Err(LiveRoomError::validation(format!(
                "Option {} is duplicated",
                option.answer
            )));
        }
    }

    if !options.iter().any(|o| o.is_correct) {
        return Err(LiveRoomError::validation("At least 1 correct answer"));
    }
    Ok(())
}

/// Creates a poll. There is no overwrite: any existing poll, whatever its
/// status, blocks a new one until it is ended or reset.
pub fn start(
    existing: Option<&CurrentPolling>,
    question: &str,
    options: &[PollingOption],
    limits: &LiveRoomSettings,
    now: DateTime,
) -> LiveRoomResult<CurrentPolling> {
    validate_options(options, limits)?;
    if existing.is_some() {
        return Err(LiveRoomError::state("the Polling already exists"));
    }

    Ok(CurrentPolling {
        options: options.to_vec(),
        question: question.to_string(),
        status: PollingStatus::Started,
        created_at: now,
        stopped_at: None,
        is_shared: false,
    })
}

pub fn require(polling: Option<CurrentPolling>) -> LiveRoomResult<CurrentPolling> {
    polling.ok_or_else(|| LiveRoomError::state("the Polling not exists"))
}

pub fn stop(polling: &mut CurrentPolling, now: DateTime) -> LiveRoomResult<()> {
    if polling.status != PollingStatus::Started {
        return Err(LiveRoomError::state(
            "Can't stop polling when polling not start",
        ));
    }
    polling.status = PollingStatus::Stopped;
    polling.stopped_at = Some(now);
    Ok(())
}

pub fn set_shared(polling: &mut CurrentPolling, is_shared: bool) -> LiveRoomResult<()> {
    if polling.status != PollingStatus::Stopped {
        return Err(LiveRoomError::state(
            "Can't share polling when polling not stop",
        ));
    }
    polling.is_shared = is_shared;
    Ok(())
}

pub fn ensure_can_end(polling: &CurrentPolling) -> LiveRoomResult<()> {
    if polling.status != PollingStatus::Stopped {
        return Err(LiveRoomError::state(
            "Can't end polling when polling not stop",
        ));
    }
    Ok(())
}

/// Checks a learner's answers against a running poll.
pub fn validate_answers(polling: &CurrentPolling, answers: &[String]) -> LiveRoomResult<()> {
    if polling.status != PollingStatus::Started {
        return Err(LiveRoomError::state(
            "Can't submit answer when polling not start",
        ));
    }
    if answers.is_empty() {
        return Err(LiveRoomError::validation("At least 1 answer"));
    }
    for answer in answers {
        if !polling.options.iter().any(|o| &o.answer == answer) {
            return Err(LiveRoomError::validation(format!(
                "The answer {answer} doesn't belong to options"
            )));
        }
    }
    Ok(())
}

/// A member-state row counts as an answer once it holds any option.
pub fn has_answered(state: &LessonMemberState) -> bool {
    !state.string_array_value.is_empty()
}

/// Builds the immutable record of an ended poll.
pub fn archive(
    lesson_id: &str,
    polling: &CurrentPolling,
    answers: &[LessonMemberState],
    ended_at: DateTime,
) -> LessonPolling {
    let students_answers = answers
        .iter()
        .filter(|s| has_answered(s))
        .map(|s| StudentAnswer {
            user_id: s.user_id.clone(),
            answers: s.string_array_value.clone(),
            submitted_at: s.updated_at,
        })
        .collect();

    LessonPolling {
        poll_id: LessonPolling::new_id(),
        lesson_id: lesson_id.to_string(),
        question: polling.question.clone(),
        options: polling.options.clone(),
        students_answers,
        created_at: polling.created_at,
        stopped_at: polling.stopped_at,
        ended_at,
    }
}
