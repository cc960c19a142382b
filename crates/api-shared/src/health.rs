use crate::dto::HealthRes;

/// Health service shared by the server binary and the REST router.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Reports the service as alive.
    ///
    /// There are no external dependencies to check, so this always succeeds.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "HIV chart is alive".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_health_reports_ok() {
        let res = HealthService::check_health();
        assert!(res.ok);
        assert!(res.message.contains("alive"));
    }
}
