use crate::OcrError;

/// RAII guard for COM initialization on the current thread
///
/// Recognition runs on blocking-pool threads, so every call initializes COM
/// for itself and releases it on drop.
pub struct ComGuard;

impl ComGuard {
    pub fn initialize() -> Result<Self, OcrError> {
        unsafe {
            windows::Win32::System::Com::CoInitializeEx(
                None,
                windows::Win32::System::Com::COINIT_MULTITHREADED,
            )
            .ok()
            .map_err(|e| OcrError::Engine(format!("Failed to initialize COM: {e}")))?;
        }
        Ok(ComGuard)
    }
}

impl Drop for ComGuard {
    fn drop(&mut self) {
        unsafe {
            windows::Win32::System::Com::CoUninitialize();
        }
    }
}
