#[cfg(test)]
mod tests {
    use crate::http::{RateLimitSettings, RateLimitedHttpClient};
    use reqwest::Method;
    use std::time::Duration;

    fn client(base_url: &str) -> RateLimitedHttpClient {
        RateLimitedHttpClient::new(
            base_url,
            "anon-key",
            RateLimitSettings::default(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = client("https://project.supabase.co/");
        assert_eq!(client.base_url(), "https://project.supabase.co");
    }

    #[test]
    fn test_requests_carry_api_key_headers() {
        let client = client("https://project.supabase.co");
        let request = client
            .request(Method::GET, "/rest/v1/floorplan_submissions")
            .build()
            .unwrap();

        assert_eq!(
            request.url().as_str(),
            "https://project.supabase.co/rest/v1/floorplan_submissions"
        );
        assert_eq!(request.headers()["apikey"], "anon-key");
        assert_eq!(request.headers()["authorization"], "Bearer anon-key");
    }

    #[test]
    fn test_zero_rate_falls_back_to_minimum() {
        let limits = RateLimitSettings {
            requests_per_second: 0,
            burst_capacity: 0,
        };
        assert!(RateLimitedHttpClient::new("http://localhost", "k", limits, Duration::from_secs(1)).is_ok());
    }
}
