use std::sync::Arc;
use std::time::Duration;

use tonic::Request;
use tonic::Response;
use tonic::Status;

use super::context::request_context;
use super::handlers::is_admin;
use super::handlers::login;
use super::handlers::register;
use crate::domain::auth::ports::AuthServicePort;
use crate::proto::auth_server::Auth;
use crate::proto::IsAdminRequest;
use crate::proto::IsAdminResponse;
use crate::proto::LoginRequest;
use crate::proto::LoginResponse;
use crate::proto::RegisterRequest;
use crate::proto::RegisterResponse;

/// gRPC adapter exposing the auth service as `sso.Auth`.
pub struct AuthGrpcService<S: AuthServicePort> {
    service: Arc<S>,
    timeout: Duration,
}

impl<S: AuthServicePort> AuthGrpcService<S> {
    /// # Arguments
    /// * `service` - Domain service handling the calls
    /// * `timeout` - Default deadline per call, caps client deadlines
    pub fn new(service: Arc<S>, timeout: Duration) -> Self {
        Self { service, timeout }
    }
}

#[tonic::async_trait]
impl<S: AuthServicePort> Auth for AuthGrpcService<S> {
    async fn register(
        &self,
        request: Request<RegisterRequest>,
    ) -> Result<Response<RegisterResponse>, Status> {
        let ctx = request_context(request.metadata(), self.timeout);
        let response =
            register::register(self.service.as_ref(), &ctx, request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> Result<Response<LoginResponse>, Status> {
        let ctx = request_context(request.metadata(), self.timeout);
        let response = login::login(self.service.as_ref(), &ctx, request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn is_admin(
        &self,
        request: Request<IsAdminRequest>,
    ) -> Result<Response<IsAdminResponse>, Status> {
        let ctx = request_context(request.metadata(), self.timeout);
        let response =
            is_admin::is_admin(self.service.as_ref(), &ctx, request.into_inner()).await?;
        Ok(Response::new(response))
    }
}
