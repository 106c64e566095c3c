//! App builder - constructs and runs a Modkit application

use std::sync::Arc;

use modkit_core::app::{AppBuilderOpts, AppState, Collaborators};
use modkit_core::extensions::Extensions;
use modkit_modules::{AccessGateway, Module, RegistryBuilder};
use modkit_types::access::{AccessChecker, Authenticator, UserDirectory};
use modkit_types::settings_adapter::SettingsAdapter;

use crate::prelude::*;
use crate::routes;

pub use modkit_core::app::VERSION;

pub struct AppBuilder {
	opts: AppBuilderOpts,
	collaborators: Collaborators,
	modules: Vec<Arc<dyn Module>>,
}

impl AppBuilder {
	pub fn new() -> Self {
		// try_init: embedders and tests may already have a subscriber
		let _ = tracing_subscriber::fmt()
			.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
			.with_target(false)
			.try_init();
		AppBuilder {
			opts: AppBuilderOpts { listen: "127.0.0.1:8080".into() },
			collaborators: Collaborators {
				settings_adapter: None,
				access_checker: None,
				user_directory: None,
				authenticator: None,
			},
			modules: Vec::new(),
		}
	}

	// Opts
	pub fn listen(&mut self, listen: impl Into<Box<str>>) -> &mut Self {
		self.opts.listen = listen.into();
		self
	}

	// Collaborators
	pub fn settings_adapter(&mut self, settings_adapter: Arc<dyn SettingsAdapter>) -> &mut Self {
		self.collaborators.settings_adapter = Some(settings_adapter);
		self
	}
	pub fn access_checker(&mut self, access_checker: Arc<dyn AccessChecker>) -> &mut Self {
		self.collaborators.access_checker = Some(access_checker);
		self
	}
	pub fn user_directory(&mut self, user_directory: Arc<dyn UserDirectory>) -> &mut Self {
		self.collaborators.user_directory = Some(user_directory);
		self
	}
	pub fn authenticator(&mut self, authenticator: Arc<dyn Authenticator>) -> &mut Self {
		self.collaborators.authenticator = Some(authenticator);
		self
	}

	/// Register one module of the catalog. Catalog integrity (unknown
	/// dependencies, cycles, duplicate slugs) is validated in [`Self::build`].
	pub fn module(&mut self, module: Arc<dyn Module>) -> &mut Self {
		self.modules.push(module);
		self
	}

	/// Assemble the application state and its router without serving.
	/// Useful for embedding and for driving the API in tests.
	pub async fn build(self) -> MkResult<(App, axum::Router)> {
		let Some(settings_adapter) = self.collaborators.settings_adapter else {
			error!("FATAL: No settings adapter configured");
			return Err(Error::Config("No settings adapter configured".into()));
		};
		let Some(access_checker) = self.collaborators.access_checker else {
			error!("FATAL: No access checker configured");
			return Err(Error::Config("No access checker configured".into()));
		};
		let Some(user_directory) = self.collaborators.user_directory else {
			error!("FATAL: No user directory configured");
			return Err(Error::Config("No user directory configured".into()));
		};
		let Some(authenticator) = self.collaborators.authenticator else {
			error!("FATAL: No authenticator configured");
			return Err(Error::Config("No authenticator configured".into()));
		};

		let mut builder = RegistryBuilder::new();
		for module in self.modules {
			builder = builder.register(module);
		}
		let registry = Arc::new(builder.build(settings_adapter.clone()).await?);
		let gateway = AccessGateway::new(registry.clone(), user_directory.clone());

		let mut extensions = Extensions::new();
		modkit_modules::init(&mut extensions, registry, gateway);

		let app: App = Arc::new(AppState {
			opts: self.opts,
			settings_adapter,
			access_checker,
			user_directory,
			authenticator,
			extensions,
		});

		let router = routes::init(app.clone());
		Ok((app, router))
	}

	pub async fn run(self) -> MkResult<()> {
		info!("Modkit v{}", VERSION);

		let (app, router) = self.build().await?;

		let listener = tokio::net::TcpListener::bind(app.opts.listen.as_ref()).await?;
		info!("Listening on {}", app.opts.listen);
		axum::serve(listener, router).await?;

		Ok(())
	}
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}

// vim: ts=4
