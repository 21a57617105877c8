use tonic::Status;

use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::context::RequestContext;
use crate::proto::RegisterRequest;
use crate::proto::RegisterResponse;

pub async fn register<S: AuthServicePort>(
    service: &S,
    ctx: &RequestContext,
    request: RegisterRequest,
) -> Result<RegisterResponse, Status> {
    let command = RegisterCommand {
        email: request.email,
        password: request.password,
    };

    let user_id = service.register(ctx, command).await?;

    Ok(RegisterResponse { user_id: user_id.0 })
}
