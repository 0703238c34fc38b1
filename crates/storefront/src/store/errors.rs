//! Request-status slice shared by every async action.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusAction {
    IsFetching,
    IsSuccess,
    IsError(String),
    ButtonLoader,
    CategoryLoader,
    CategorySuccess,
    CategoryError(String),
}

/// Loading flags and the last request error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestStatus {
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub btn_loader: bool,
    pub category_loader: bool,
    pub category_error: Option<String>,
}

impl RequestStatus {
    pub fn reduce(&mut self, action: StatusAction) {
        match action {
            StatusAction::IsFetching => {
                self.is_loading = true;
                self.error_message = None;
            }
            StatusAction::IsSuccess => {
                self.is_loading = false;
                self.btn_loader = false;
                self.error_message = None;
            }
            StatusAction::IsError(message) => {
                self.is_loading = false;
                self.btn_loader = false;
                self.error_message = Some(message);
            }
            StatusAction::ButtonLoader => self.btn_loader = true,
            StatusAction::CategoryLoader => {
                self.category_loader = true;
                self.category_error = None;
            }
            StatusAction::CategorySuccess => {
                self.category_loader = false;
                self.category_error = None;
            }
            StatusAction::CategoryError(message) => {
                self.category_loader = false;
                self.category_error = Some(message);
            }
        }
    }
}
