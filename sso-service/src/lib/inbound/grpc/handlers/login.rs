use tonic::Status;

use crate::domain::auth::models::AppId;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::context::RequestContext;
use crate::proto::LoginRequest;
use crate::proto::LoginResponse;

pub async fn login<S: AuthServicePort>(
    service: &S,
    ctx: &RequestContext,
    request: LoginRequest,
) -> Result<LoginResponse, Status> {
    let command = LoginCommand {
        email: request.email,
        password: request.password,
        app_id: AppId(request.app_id),
    };

    let token = service.login(ctx, command).await?;

    Ok(LoginResponse { token })
}
