use autoriza_shared::account::{handle::UserDescriptor, User};
use reqwest::{Method, RequestBuilder, Response};

use crate::Error;

/// Staff accounts, administration only.
pub struct List;

#[async_trait::async_trait]
impl super::Request for List {
    type Output = Vec<User>;

    fn url_suffix(&self) -> String {
        "/usuarios/".to_owned()
    }

    async fn parse_res(&mut self, response: Response) -> Result<Self::Output, Error> {
        super::json(response).await
    }
}

pub struct Create {
    pub descriptor: UserDescriptor,
}

#[async_trait::async_trait]
impl super::Request for Create {
    type Output = User;
    const METHOD: Method = Method::POST;

    fn url_suffix(&self) -> String {
        "/usuarios/".to_owned()
    }

    fn make_req(&self, req: RequestBuilder) -> Result<RequestBuilder, Error> {
        Ok(req.json(&self.descriptor))
    }

    async fn parse_res(&mut self, response: Response) -> Result<Self::Output, Error> {
        super::json(response).await
    }
}

pub struct Update {
    pub id: u64,
    pub descriptor: UserDescriptor,
}

#[async_trait::async_trait]
impl super::Request for Update {
    type Output = User;
    const METHOD: Method = Method::PUT;

    fn url_suffix(&self) -> String {
        format!("/usuarios/{}", self.id)
    }

    fn make_req(&self, req: RequestBuilder) -> Result<RequestBuilder, Error> {
        Ok(req.json(&self.descriptor))
    }

    async fn parse_res(&mut self, response: Response) -> Result<Self::Output, Error> {
        super::json(response).await
    }
}

pub struct Delete {
    pub id: u64,
}

#[async_trait::async_trait]
impl super::Request for Delete {
    type Output = ();
    const METHOD: Method = Method::DELETE;

    fn url_suffix(&self) -> String {
        format!("/usuarios/{}", self.id)
    }

    async fn parse_res(&mut self, _response: Response) -> Result<Self::Output, Error> {
        Ok(())
    }
}
