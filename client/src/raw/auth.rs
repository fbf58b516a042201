use autoriza_shared::account::handle::{
    CodeFlow, RegisterDescriptor, RequestCodeDescriptor, SetPasswordDescriptor,
    VerifyCodeDescriptor,
};
use reqwest::{Method, RequestBuilder, Response};

use crate::Error;

pub struct Login {
    pub email: String,
    pub password: String,
}

#[async_trait::async_trait]
impl super::Request for Login {
    /// The access token.
    type Output = String;
    const METHOD: Method = Method::POST;

    fn url_suffix(&self) -> String {
        "/auth/token".to_owned()
    }

    fn make_req(&self, req: RequestBuilder) -> Result<RequestBuilder, Error> {
        Ok(req.form(&[
            ("username", self.email.as_str()),
            ("password", self.password.as_str()),
        ]))
    }

    async fn parse_res(&mut self, response: Response) -> Result<Self::Output, Error> {
        #[derive(serde::Deserialize)]
        struct ResponseBody {
            access_token: String,
        }

        Ok(super::json::<ResponseBody>(response).await?.access_token)
    }
}

pub struct Register {
    pub descriptor: RegisterDescriptor,
}

#[async_trait::async_trait]
impl super::Request for Register {
    type Output = ();
    const METHOD: Method = Method::POST;

    fn url_suffix(&self) -> String {
        "/auth/register".to_owned()
    }

    fn make_req(&self, req: RequestBuilder) -> Result<RequestBuilder, Error> {
        Ok(req.json(&self.descriptor))
    }

    async fn parse_res(&mut self, _response: Response) -> Result<Self::Output, Error> {
        Ok(())
    }
}

/// Requests a verification code by email, for registration or password reset.
pub struct RequestCode {
    pub email: String,
    pub flow: CodeFlow,
}

#[async_trait::async_trait]
impl super::Request for RequestCode {
    type Output = ();
    const METHOD: Method = Method::POST;

    fn url_suffix(&self) -> String {
        match self.flow {
            CodeFlow::Register { .. } => "/auth/register/request-code".to_owned(),
            CodeFlow::ResetPassword => "/auth/password-reset/request-code".to_owned(),
        }
    }

    fn make_req(&self, req: RequestBuilder) -> Result<RequestBuilder, Error> {
        Ok(req.json(&RequestCodeDescriptor {
            email: self.email.trim().to_owned(),
            name: match self.flow {
                CodeFlow::Register { ref name } => Some(name.to_owned()),
                CodeFlow::ResetPassword => None,
            },
        }))
    }

    async fn parse_res(&mut self, _response: Response) -> Result<Self::Output, Error> {
        Ok(())
    }
}

pub struct VerifyCode {
    pub descriptor: VerifyCodeDescriptor,
}

#[async_trait::async_trait]
impl super::Request for VerifyCode {
    type Output = ();
    const METHOD: Method = Method::POST;

    fn url_suffix(&self) -> String {
        "/auth/register/verify-code".to_owned()
    }

    fn make_req(&self, req: RequestBuilder) -> Result<RequestBuilder, Error> {
        Ok(req.json(&self.descriptor))
    }

    async fn parse_res(&mut self, _response: Response) -> Result<Self::Output, Error> {
        Ok(())
    }
}

pub struct SetPassword {
    pub descriptor: SetPasswordDescriptor,
}

#[async_trait::async_trait]
impl super::Request for SetPassword {
    type Output = ();
    const METHOD: Method = Method::POST;

    fn url_suffix(&self) -> String {
        "/auth/register/set-password".to_owned()
    }

    fn make_req(&self, req: RequestBuilder) -> Result<RequestBuilder, Error> {
        Ok(req.json(&self.descriptor))
    }

    async fn parse_res(&mut self, _response: Response) -> Result<Self::Output, Error> {
        Ok(())
    }
}
