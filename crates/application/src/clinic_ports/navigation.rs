use vetclinic_domain::View;

/// Port for moving the user to another view after a submission.
pub trait Navigator: Send + Sync {
    /// Navigates to the given view.
    fn navigate(&self, view: View);
}
