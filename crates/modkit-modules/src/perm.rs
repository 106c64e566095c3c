//! Named capability gates for the module API.
//!
//! Every handler calls its gate before touching the registry; a failed
//! gate short-circuits with the permission-denied error. The setup
//! capability doubles for insight and option gates so setup flows work
//! before a full configuration exists.

use modkit_core::app::AppState;

use crate::prelude::*;

pub async fn can_setup(app: &AppState, auth: &AuthCtx) -> MkResult<()> {
	app.require(auth, Capability::Setup).await
}

pub async fn can_authenticate(app: &AppState, auth: &AuthCtx) -> MkResult<()> {
	app.require(auth, Capability::Authenticate).await
}

/// Module listings are visible from the dashboard and from the pre-setup
/// splash.
pub async fn can_list_modules(app: &AppState, auth: &AuthCtx) -> MkResult<()> {
	if app.access_checker.can(auth, Capability::ViewDashboard).await
		|| app.access_checker.can(auth, Capability::ViewSplash).await
	{
		Ok(())
	} else {
		Err(Error::PermissionDenied)
	}
}

pub async fn can_view_insights(app: &AppState, auth: &AuthCtx) -> MkResult<()> {
	if app.access_checker.can(auth, Capability::Setup).await
		|| app.access_checker.can(auth, Capability::ViewInsights).await
	{
		Ok(())
	} else {
		Err(Error::PermissionDenied)
	}
}

pub async fn can_manage_options(app: &AppState, auth: &AuthCtx) -> MkResult<()> {
	if app.access_checker.can(auth, Capability::Setup).await
		|| app.access_checker.can(auth, Capability::ManageOptions).await
	{
		Ok(())
	} else {
		Err(Error::PermissionDenied)
	}
}

// vim: ts=4
