use tonic::Status;

use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::context::RequestContext;
use crate::proto::IsAdminRequest;
use crate::proto::IsAdminResponse;

pub async fn is_admin<S: AuthServicePort>(
    service: &S,
    ctx: &RequestContext,
    request: IsAdminRequest,
) -> Result<IsAdminResponse, Status> {
    if request.user_id == 0 {
        return Err(Status::invalid_argument("userId is required"));
    }

    let is_admin = service.is_admin(ctx, UserId(request.user_id)).await?;

    Ok(IsAdminResponse { is_admin })
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use mockall::mock;
    use tonic::Code;

    use super::*;
    use crate::domain::auth::errors::AuthError;
    use crate::domain::auth::errors::AuthErrorKind;
    use crate::domain::auth::models::LoginCommand;
    use crate::domain::auth::models::RegisterCommand;

    mock! {
        pub TestAuthService {}

        #[async_trait]
        impl AuthServicePort for TestAuthService {
            async fn register(
                &self,
                ctx: &RequestContext,
                command: RegisterCommand,
            ) -> Result<UserId, AuthError>;
            async fn login(
                &self,
                ctx: &RequestContext,
                command: LoginCommand,
            ) -> Result<String, AuthError>;
            async fn is_admin(
                &self,
                ctx: &RequestContext,
                user_id: UserId,
            ) -> Result<bool, AuthError>;
        }
    }

    #[tokio::test]
    async fn test_zero_user_id_rejected_before_domain() {
        let mut service = MockTestAuthService::new();
        service.expect_is_admin().times(0);

        let status = is_admin(
            &service,
            &RequestContext::new(),
            IsAdminRequest { user_id: 0 },
        )
        .await
        .unwrap_err();

        assert_eq!(status.code(), Code::InvalidArgument);
        assert!(status.message().contains("userId is required"));
    }

    #[tokio::test]
    async fn test_unknown_user_maps_to_unauthenticated() {
        let mut service = MockTestAuthService::new();
        service
            .expect_is_admin()
            .withf(|_, user_id| *user_id == UserId(7))
            .times(1)
            .returning(|_, _| {
                Err(AuthError::new(
                    "auth.is_admin",
                    AuthErrorKind::InvalidCredentials,
                ))
            });

        let status = is_admin(
            &service,
            &RequestContext::new(),
            IsAdminRequest { user_id: 7 },
        )
        .await
        .unwrap_err();

        assert_eq!(status.code(), Code::Unauthenticated);
        assert!(status.message().contains("invalid credentials"));
    }

    #[tokio::test]
    async fn test_is_admin_passes_flag_through() {
        let mut service = MockTestAuthService::new();
        service
            .expect_is_admin()
            .times(1)
            .returning(|_, _| Ok(true));

        let response = is_admin(
            &service,
            &RequestContext::new(),
            IsAdminRequest { user_id: 1 },
        )
        .await
        .unwrap();

        assert!(response.is_admin);
    }
}
