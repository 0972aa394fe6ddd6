//! FFI bindings for Synheart Affect
//!
//! C-compatible entry points for the questionnaire and fusion paths. All functions take
//! null-terminated C strings and return allocated strings that must be
//! released with `affect_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::aggregator::MultiModalAggregator;
use crate::error::AssessError;
use crate::fusion::ComponentInputs;
use crate::interpret::Interpreter;
use crate::pipeline::{fuse_components, requests_to_reports};
use crate::scoring::CategorySums;
use crate::types::VoiceReading;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Hand a result across the boundary, recording the error on failure
fn finish(result: Result<String, AssessError>) -> *mut c_char {
    match result {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Questionnaire API
// ============================================================================

/// Score a batch of assessment.request.v1 records (JSON array or NDJSON)
/// and return a JSON array of report envelopes.
///
/// # Safety
/// - `requests` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `affect_free_string`.
/// - Returns NULL on error; call `affect_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn affect_score_questionnaire(requests: *const c_char) -> *mut c_char {
    clear_last_error();

    let Some(input) = cstr_to_string(requests) else {
        set_last_error("Invalid requests string pointer");
        return ptr::null_mut();
    };

    finish(requests_to_reports(&input).map(|reports| format!("[{}]", reports.join(","))))
}

/// Combine raw subscale sums with per-question voice readings and return the
/// resulting assessment as JSON.
///
/// `scores` is `{"depression": n, "anxiety": n, "stress": n}` on the 42-point
/// scale; larger sums are rejected. `voice` is a JSON array of readings and may be NULL.
///
/// # Safety
/// - `scores` must be a valid null-terminated C string; `voice` must be one or NULL.
/// - Returns a newly allocated string that must be freed with `affect_free_string`.
/// - Returns NULL on error; call `affect_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn affect_aggregate(
    scores: *const c_char,
    voice: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let Some(scores_json) = cstr_to_string(scores) else {
        set_last_error("Invalid scores string pointer");
        return ptr::null_mut();
    };

    let voice_json = if voice.is_null() {
        None
    } else {
        match cstr_to_string(voice) {
            Some(s) => Some(s),
            None => {
                set_last_error("Invalid voice string pointer");
                return ptr::null_mut();
            }
        }
    };

    finish(aggregate_json(&scores_json, voice_json.as_deref()))
}

fn aggregate_json(scores_json: &str, voice_json: Option<&str>) -> Result<String, AssessError> {
    let sums: CategorySums = serde_json::from_str(scores_json)?;
    sums.check_range()?;
    let voice: Vec<VoiceReading> = match voice_json {
        Some(json) => serde_json::from_str(json)?,
        None => Vec::new(),
    };

    let combined = MultiModalAggregator::aggregate(&sums.classify(), &voice);
    let assessment = Interpreter::assess(combined, MultiModalAggregator::has_voice_signal(&voice));
    Ok(serde_json::to_string(&assessment)?)
}

// ============================================================================
// Fusion API
// ============================================================================

/// Fuse voice, sentiment, keyword and facial components with the default
/// weights and return the fused assessment as JSON.
///
/// # Safety
/// - `inputs` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `affect_free_string`.
/// - Returns NULL on error; call `affect_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn affect_fuse(inputs: *const c_char) -> *mut c_char {
    clear_last_error();

    let Some(input) = cstr_to_string(inputs) else {
        set_last_error("Invalid inputs string pointer");
        return ptr::null_mut();
    };

    finish(fuse_json(&input))
}

fn fuse_json(inputs_json: &str) -> Result<String, AssessError> {
    let inputs: ComponentInputs = serde_json::from_str(inputs_json)?;
    let fused = fuse_components(&inputs)?;
    Ok(serde_json::to_string(&fused)?)
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Affect functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by an Affect function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn affect_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The pointer is valid until the next Affect call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn affect_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

/// Get the library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn affect_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SCHEMA_VERSION;

    fn sample_requests() -> CString {
        let line = serde_json::json!({
            "schema_version": SCHEMA_VERSION,
            "kind": "questionnaire",
            "responses": vec![2; 21]
        });
        CString::new(format!("{line}\n{line}\n")).unwrap()
    }

    #[test]
    fn test_ffi_score_questionnaire() {
        let requests = sample_requests();

        unsafe {
            let result = affect_score_questionnaire(requests.as_ptr());
            assert!(!result.is_null());

            let result_str = CStr::from_ptr(result).to_str().unwrap();
            let reports: serde_json::Value = serde_json::from_str(result_str).unwrap();
            assert_eq!(reports.as_array().unwrap().len(), 2);
            assert_eq!(reports[0]["result"]["scores"]["anxiety"]["raw"], 28);

            affect_free_string(result);
        }
    }

    #[test]
    fn test_ffi_aggregate() {
        let scores = CString::new(r#"{"depression": 4, "anxiety": 4, "stress": 4}"#).unwrap();
        let voice = CString::new(r#"[{"depression": 20}, {"depression": 30}]"#).unwrap();

        unsafe {
            let result = affect_aggregate(scores.as_ptr(), voice.as_ptr());
            assert!(!result.is_null());

            let assessment: serde_json::Value =
                serde_json::from_str(CStr::from_ptr(result).to_str().unwrap()).unwrap();
            assert_eq!(assessment["scores"]["depression"]["raw"], 20);
            assert_eq!(assessment["scores"]["depression"]["severity"], "moderate");
            assert_eq!(assessment["scores"]["anxiety"]["raw"], 4);
            assert_eq!(assessment["voice_adjusted"], true);
            affect_free_string(result);

            let result = affect_aggregate(scores.as_ptr(), ptr::null());
            assert!(!result.is_null());
            let assessment: serde_json::Value =
                serde_json::from_str(CStr::from_ptr(result).to_str().unwrap()).unwrap();
            assert_eq!(assessment["voice_adjusted"], false);
            affect_free_string(result);

            let loud = CString::new(r#"[{"stress": 1e300}]"#).unwrap();
            let result = affect_aggregate(scores.as_ptr(), loud.as_ptr());
            assert!(!result.is_null());
            let assessment: serde_json::Value =
                serde_json::from_str(CStr::from_ptr(result).to_str().unwrap()).unwrap();
            assert_eq!(assessment["scores"]["stress"]["raw"], 42);
            assert_eq!(assessment["percentages"]["stress"], 100.0);
            affect_free_string(result);
        }
    }

    #[test]
    fn test_ffi_error_handling() {
        unsafe {
            let invalid = CString::new("not json").unwrap();
            let result = affect_score_questionnaire(invalid.as_ptr());
            assert!(result.is_null());

            let error = affect_last_error();
            assert!(!error.is_null());
            assert!(!CStr::from_ptr(error).to_str().unwrap().is_empty());

            let result = affect_aggregate(ptr::null(), ptr::null());
            assert!(result.is_null());

            let oversized = CString::new(
                r#"{"depression": 4294967295, "anxiety": 4294967295, "stress": 4294967295}"#,
            )
            .unwrap();
            let result = affect_aggregate(oversized.as_ptr(), ptr::null());
            assert!(result.is_null());
            assert!(!affect_last_error().is_null());
        }
    }

    #[test]
    fn test_ffi_fuse() {
        let inputs = CString::new(
            r#"{"voice": {"depression": 30, "anxiety": 10, "stress": 10},
                "facial": {"Sadness": 1.0}}"#,
        )
        .unwrap();

        unsafe {
            let result = affect_fuse(inputs.as_ptr());
            assert!(!result.is_null());

            let fused: serde_json::Value =
                serde_json::from_str(CStr::from_ptr(result).to_str().unwrap()).unwrap();
            assert_eq!(fused["quality"]["available_components"], 2);
            assert_eq!(fused["risk"]["primary_concern"], "depression");
            affect_free_string(result);

            let negative = CString::new(r#"{"voice": {"stress": -4}}"#).unwrap();
            assert!(affect_fuse(negative.as_ptr()).is_null());
            assert!(!affect_last_error().is_null());
        }
    }

    #[test]
    fn test_ffi_version() {
        unsafe {
            let version = affect_version();
            let version_str = CStr::from_ptr(version).to_str().unwrap();
            assert_eq!(version_str, env!("CARGO_PKG_VERSION"));
        }
    }
}
