use crate::domain::{ReleaseTag, RepositoryDescriptor};
use crate::error::{ReleaseError, Result};
use crate::hosting::{api_base_url, ApiTarget, HostingApi, NewTag};
use crate::release::require_token;
use git2::Oid;
use tracing::info;

/// Inputs of one remote release call
#[derive(Debug, Clone)]
pub struct ReleaseRequest<'a> {
    pub repository: &'a RepositoryDescriptor,
    pub token: Option<&'a str>,
    pub tag: &'a ReleaseTag,
    /// Commit the tag points at
    pub target: Oid,
    pub insecure_api: bool,
    pub dry_run: bool,
}

/// Publishes the release tag to the hosting service
pub struct RemoteReleaser<'a, H: HostingApi + ?Sized> {
    api: &'a H,
}

impl<'a, H: HostingApi + ?Sized> RemoteReleaser<'a, H> {
    pub fn new(api: &'a H) -> Self {
        RemoteReleaser { api }
    }

    pub fn release(&self, request: &ReleaseRequest<'_>) -> Result<()> {
        let base_url = api_base_url(&request.repository.domain, request.insecure_api)?;
        let tag_name = request.tag.name();

        if request.dry_run {
            info!(tag = %tag_name, api = %base_url, "dry run: skipping remote release");
            return Ok(());
        }

        let target = ApiTarget {
            base_url,
            project: request.repository.project_path(),
            token: require_token(request.token)?.to_string(),
        };
        let new_tag = NewTag {
            message: format!("Release {}", tag_name),
            tag_name,
            reference: request.target.to_string(),
        };

        self.api
            .create_tag(&target, &new_tag)
            .map_err(|failure| ReleaseError::ReleaseApi {
                status: failure.status,
                message: failure.message,
            })?;

        info!(tag = %new_tag.tag_name, project = %target.project, "created remote release");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hosting::mock::ApiCall;
    use crate::hosting::MockHostingApi;

    fn repository() -> RepositoryDescriptor {
        RepositoryDescriptor::new("gitlab.com", "user", "project").unwrap()
    }

    fn request<'a>(
        repository: &'a RepositoryDescriptor,
        tag: &'a ReleaseTag,
        token: Option<&'a str>,
    ) -> ReleaseRequest<'a> {
        ReleaseRequest {
            repository,
            token,
            tag,
            target: Oid::zero(),
            insecure_api: false,
            dry_run: false,
        }
    }

    #[test]
    fn test_release_posts_tag() {
        let api = MockHostingApi::new();
        let repository = repository();
        let tag = ReleaseTag::parse("1.2.0").unwrap();

        RemoteReleaser::new(&api)
            .release(&request(&repository, &tag, Some("secret")))
            .unwrap();

        match &api.calls()[..] {
            [ApiCall::CreateTag { target, tag }] => {
                assert_eq!(target.base_url.as_str(), "https://gitlab.com/api/v4/");
                assert_eq!(target.project, "user/project");
                assert_eq!(target.token, "secret");
                assert_eq!(tag.tag_name, "1.2.0");
                assert_eq!(tag.message, "Release 1.2.0");
                assert_eq!(tag.reference, Oid::zero().to_string());
            }
            other => panic!("unexpected calls: {:?}", other),
        }
    }

    #[test]
    fn test_insecure_api_uses_http() {
        let api = MockHostingApi::new();
        let repository = repository();
        let tag = ReleaseTag::parse("1.2.0").unwrap();
        let mut req = request(&repository, &tag, Some("secret"));
        req.insecure_api = true;

        RemoteReleaser::new(&api).release(&req).unwrap();

        match &api.calls()[..] {
            [ApiCall::CreateTag { target, .. }] => {
                assert_eq!(target.base_url.scheme(), "http")
            }
            other => panic!("unexpected calls: {:?}", other),
        }
    }

    #[test]
    fn test_dry_run_makes_no_call() {
        let api = MockHostingApi::new();
        let repository = repository();
        let tag = ReleaseTag::parse("1.2.0").unwrap();
        let mut req = request(&repository, &tag, None);
        req.dry_run = true;

        RemoteReleaser::new(&api).release(&req).unwrap();
        assert!(api.calls().is_empty());
    }

    #[test]
    fn test_error_response_becomes_release_api_error() {
        let api = MockHostingApi::new().fail_tag_creation(400, "Tag 1.2.0 already exists");
        let repository = repository();
        let tag = ReleaseTag::parse("1.2.0").unwrap();

        let err = RemoteReleaser::new(&api)
            .release(&request(&repository, &tag, Some("secret")))
            .unwrap_err();
        match err {
            ReleaseError::ReleaseApi { status, message } => {
                assert_eq!(status, Some(400));
                assert_eq!(message, "Tag 1.2.0 already exists");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_missing_token_fails_before_call() {
        let api = MockHostingApi::new();
        let repository = repository();
        let tag = ReleaseTag::parse("1.2.0").unwrap();

        let err = RemoteReleaser::new(&api)
            .release(&request(&repository, &tag, None))
            .unwrap_err();
        assert!(matches!(err, ReleaseError::Configuration(_)));
        assert!(api.calls().is_empty());
    }
}
