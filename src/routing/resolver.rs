use async_trait::async_trait;

pub type ResolveError = Box<dyn std::error::Error + Send + Sync>;

/// 오케스트레이션 플랫폼에 서비스 존재 여부를 묻는 인터페이스입니다.
///
/// 조회 자체의 실패는 `Err`로, 확인된 부재는 `Ok(false)`로 구분해서 돌려줍니다.
#[async_trait]
pub trait ServiceResolver: Send + Sync {
    async fn exists(&self, name: &str) -> Result<bool, ResolveError>;
}
