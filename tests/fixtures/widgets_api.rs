use crate::model::{ApiError, Widget};

/// Shared behaviour of every secured resource.
#[secured]
#[produces("application/json")]
pub struct BaseResource;

#[route("widgets")]
#[extends(BaseResource)]
#[consumes("application/json")]
#[derive(Clone)]
pub struct WidgetResource {
    store: Vec<Widget>,
}

impl WidgetResource {
    #[get]
    #[api_operation(summary = "List widgets", notes = "Sorted by name", tags = ["widgets", "read"])]
    #[api_responses(
        response(code = 200, response = "Vec<Widget>"),
        response(code = 404, response = ApiError),
        response(code = 500, response = ApiError),
    )]
    pub fn list(
        &self,
        req: &HttpRequest,
        #[query_param("page")]
        #[default_value("1")]
        page: u32,
    ) -> Vec<Widget> {
        self.store.clone()
    }

    #[get]
    #[route("/{id}")]
    pub fn fetch(
        &self,
        #[path_param("id")]
        #[pattern("^[0-9]+$")]
        id: String,
    ) -> Result<Widget, ApiError> {
        self.store
            .iter()
            .find(|w| w.id == id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    #[post]
    #[consumes("application/xml")]
    #[deprecated]
    pub fn create(&mut self, widget: Widget) -> Widget {
        self.store.push(widget.clone());
        widget
    }

    #[delete]
    #[route("{id}")]
    pub fn remove(&mut self, #[path_param("id")] id: String) {
        self.store.retain(|w| w.id != id);
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }
}
