//! FFI bindings for the recovery engine
//!
//! C-compatible functions for calling the engine from mobile and dashboard
//! hosts. Strings are null-terminated UTF-8. Every returned string is newly
//! allocated and must be released with `recovery_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::config::EngineConfig;
use crate::goals::RecoveryTargets;
use crate::history::DEFAULT_HISTORY_WINDOW;
use crate::pipeline::{evaluate_day, evaluate_series, RecoveryProcessor};

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

/// Caller must free with `recovery_free_string`
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Join already-serialized reports into a JSON array
fn reports_to_json_array(reports: Vec<String>) -> String {
    format!("[{}]", reports.join(","))
}

fn targets_or_error(
    protein_target_g: f64,
    calorie_target_kcal: f64,
    step_target: f64,
) -> Option<RecoveryTargets> {
    match RecoveryTargets::new(protein_target_g, calorie_target_kcal, step_target) {
        Ok(targets) => Some(targets),
        Err(e) => {
            set_last_error(&e.to_string());
            None
        }
    }
}

// ============================================================================
// Stateless API
// ============================================================================

/// Evaluate one daily record and return the report JSON.
///
/// # Safety
/// - `record_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `recovery_free_string`.
/// - Returns NULL on error; call `recovery_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn recovery_evaluate_day(
    record_json: *const c_char,
    protein_target_g: f64,
    calorie_target_kcal: f64,
    step_target: f64,
) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(record_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid record JSON string pointer");
            return ptr::null_mut();
        }
    };

    let Some(targets) = targets_or_error(protein_target_g, calorie_target_kcal, step_target) else {
        return ptr::null_mut();
    };

    match evaluate_day(json_str, &targets) {
        Ok(report) => string_to_cstr(&report),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Evaluate a JSON array of daily records for one patient and return a JSON
/// array of reports, one per day in date order.
///
/// # Safety
/// - `records_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `recovery_free_string`.
/// - Returns NULL on error; call `recovery_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn recovery_evaluate_series(
    records_json: *const c_char,
    protein_target_g: f64,
    calorie_target_kcal: f64,
    step_target: f64,
) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(records_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid records JSON string pointer");
            return ptr::null_mut();
        }
    };

    let Some(targets) = targets_or_error(protein_target_g, calorie_target_kcal, step_target) else {
        return ptr::null_mut();
    };

    match evaluate_series(json_str, &targets) {
        Ok(reports) => string_to_cstr(&reports_to_json_array(reports)),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateful Processor API
// ============================================================================

/// Opaque handle to a RecoveryProcessor
pub struct RecoveryProcessorHandle {
    processor: RecoveryProcessor,
}

/// Create a processor for one patient.
///
/// A non-positive `history_window_days` selects the default window.
///
/// # Safety
/// - Returns a pointer that must be freed with `recovery_processor_free`.
/// - Returns NULL when a target is not a positive number.
#[no_mangle]
pub unsafe extern "C" fn recovery_processor_new(
    protein_target_g: f64,
    calorie_target_kcal: f64,
    step_target: f64,
    history_window_days: i32,
) -> *mut RecoveryProcessorHandle {
    clear_last_error();

    let Some(targets) = targets_or_error(protein_target_g, calorie_target_kcal, step_target) else {
        return ptr::null_mut();
    };

    let config = EngineConfig {
        history_window_days: if history_window_days <= 0 {
            DEFAULT_HISTORY_WINDOW
        } else {
            history_window_days as usize
        },
        default_step_target: step_target,
        ..EngineConfig::default()
    };

    match RecoveryProcessor::with_config(config, targets) {
        Ok(processor) => Box::into_raw(Box::new(RecoveryProcessorHandle { processor })),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Free a processor.
///
/// # Safety
/// - `processor` must be a pointer returned by `recovery_processor_new`, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn recovery_processor_free(processor: *mut RecoveryProcessorHandle) {
    if !processor.is_null() {
        drop(Box::from_raw(processor));
    }
}

/// Process a record (JSON object) or records (JSON array) with a stateful
/// processor. Returns a JSON array of reports.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `recovery_processor_new`.
/// - `json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `recovery_free_string`.
/// - Returns NULL on error; call `recovery_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn recovery_processor_process(
    processor: *mut RecoveryProcessorHandle,
    json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return ptr::null_mut();
    }

    let handle = &mut *processor;

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    match handle.processor.process_json(&json_str) {
        Ok(reports) => string_to_cstr(&reports_to_json_array(reports)),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Save the processor's score history to JSON.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `recovery_processor_new`.
/// - Returns a newly allocated string that must be freed with `recovery_free_string`.
/// - Returns NULL on error; call `recovery_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn recovery_processor_save_history(
    processor: *mut RecoveryProcessorHandle,
) -> *mut c_char {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return ptr::null_mut();
    }

    let handle = &*processor;

    match handle.processor.save_history() {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Load the processor's score history from JSON.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `recovery_processor_new`.
/// - `json` must be a valid null-terminated C string.
/// - Returns 0 on success, -1 on error; call `recovery_last_error` for the message.
#[no_mangle]
pub unsafe extern "C" fn recovery_processor_load_history(
    processor: *mut RecoveryProcessorHandle,
    json: *const c_char,
) -> i32 {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return -1;
    }

    let handle = &mut *processor;

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return -1;
        }
    };

    match handle.processor.load_history(&json_str) {
        Ok(()) => 0,
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

/// Drop all recorded scores.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `recovery_processor_new`, or NULL.
#[no_mangle]
pub unsafe extern "C" fn recovery_processor_clear_history(processor: *mut RecoveryProcessorHandle) {
    if !processor.is_null() {
        (*processor).processor.clear_history();
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by a recovery function.
///
/// # Safety
/// - `ptr` must be a pointer returned by a recovery function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn recovery_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message for this thread.
///
/// # Safety
/// - The returned pointer is valid until the next recovery call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if the last call succeeded.
#[no_mangle]
pub unsafe extern "C" fn recovery_last_error() -> *const c_char {
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
pub unsafe extern "C" fn recovery_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> CString {
        CString::new(
            r#"{"date": "2024-03-04", "post_op_week": 2, "protein": 80, "steps": 1500,
                "movement_moments": 5, "fatigue_score": 4, "pain_score": 3, "sleep_hours": 7}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_ffi_evaluate_day() {
        unsafe {
            let json = sample_record();
            let result = recovery_evaluate_day(json.as_ptr(), 90.0, 1800.0, 2000.0);
            assert!(!result.is_null());

            let result_str = CStr::from_ptr(result).to_str().unwrap();
            let report: serde_json::Value = serde_json::from_str(result_str).unwrap();
            assert_eq!(report["post_op_week"], 2);
            assert!(report["recovery_index"]["score"].as_u64().is_some());

            recovery_free_string(result);
        }
    }

    #[test]
    fn test_ffi_evaluate_series() {
        unsafe {
            let json = CString::new(r#"[{"date": "2024-03-02"}, {"date": "2024-03-01"}]"#).unwrap();
            let result = recovery_evaluate_series(json.as_ptr(), 90.0, 1800.0, 2000.0);
            assert!(!result.is_null());

            let reports: serde_json::Value =
                serde_json::from_str(CStr::from_ptr(result).to_str().unwrap()).unwrap();
            assert_eq!(reports.as_array().map(|a| a.len()), Some(2));
            assert_eq!(reports[0]["date"], "2024-03-01");

            recovery_free_string(result);
        }
    }

    #[test]
    fn test_ffi_processor_lifecycle() {
        unsafe {
            let processor = recovery_processor_new(90.0, 1800.0, 2000.0, 7);
            assert!(!processor.is_null());

            let json = sample_record();
            let result = recovery_processor_process(processor, json.as_ptr());
            assert!(!result.is_null());
            let result_str = CStr::from_ptr(result).to_str().unwrap();
            assert!(result_str.starts_with('['));
            recovery_free_string(result);

            let history = recovery_processor_save_history(processor);
            assert!(!history.is_null());

            let processor2 = recovery_processor_new(90.0, 1800.0, 2000.0, 7);
            assert_eq!(recovery_processor_load_history(processor2, history), 0);
            assert_eq!((*processor2).processor.history_len(), 1);

            recovery_processor_clear_history(processor2);
            assert_eq!((*processor2).processor.history_len(), 0);

            recovery_free_string(history);
            recovery_processor_free(processor);
            recovery_processor_free(processor2);
        }
    }

    #[test]
    fn test_ffi_rejects_bad_targets() {
        unsafe {
            let processor = recovery_processor_new(0.0, 1800.0, 2000.0, 7);
            assert!(processor.is_null());

            let error = CStr::from_ptr(recovery_last_error()).to_str().unwrap();
            assert!(error.contains("protein_target_g"));
        }
    }

    #[test]
    fn test_ffi_error_handling() {
        unsafe {
            let invalid_json = CString::new("not json").unwrap();
            let result = recovery_evaluate_day(invalid_json.as_ptr(), 90.0, 1800.0, 2000.0);
            assert!(result.is_null());

            let error = recovery_last_error();
            assert!(!error.is_null());
            assert!(!CStr::from_ptr(error).to_str().unwrap().is_empty());

            let result = recovery_evaluate_day(ptr::null(), 90.0, 1800.0, 2000.0);
            assert!(result.is_null());
        }
    }

    #[test]
    fn test_ffi_version() {
        unsafe {
            let version = recovery_version();
            assert!(!version.is_null());
            let version_str = CStr::from_ptr(version).to_str().unwrap();
            assert_eq!(version_str, env!("CARGO_PKG_VERSION"));
        }
    }
}
