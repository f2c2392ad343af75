#[route("/health")]
pub struct HealthResource;

impl HealthResource {
    // both verbs on purpose: GET wins
    #[put]
    #[get]
    pub fn status(&self, request: Request) -> String {
        String::from("ok")
    }
}

pub struct Uptime(u64);
